//! Crypto/fiat classification of currency codes.

/// Reference currency used to bridge crypto-to-crypto pairs.
pub const CRYPTO_BRIDGE_CURRENCY: &str = "USD";

/// Recognised crypto tickers and their market-data asset ids.
const CRYPTO_ASSETS: &[(&str, &str)] = &[
    ("BTC", "bitcoin"),
    ("ETH", "ethereum"),
    ("BNB", "binancecoin"),
    ("ADA", "cardano"),
    ("SOL", "solana"),
    ("XRP", "ripple"),
    ("DOT", "polkadot"),
    ("DOGE", "dogecoin"),
    ("AVAX", "avalanche-2"),
    ("MATIC", "matic-network"),
    ("LTC", "litecoin"),
    ("LINK", "chainlink"),
    ("UNI", "uniswap"),
    ("ATOM", "cosmos"),
    ("FTM", "fantom"),
];

/// Major assets shown in the market trends view.
pub const TREND_ASSETS: &[&str] = &["BTC", "ETH", "BNB", "ADA", "SOL", "XRP"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetClass {
    Crypto,
    Fiat,
}

impl From<&str> for AssetClass {
    fn from(code: &str) -> Self {
        if is_crypto(code) {
            AssetClass::Crypto
        } else {
            AssetClass::Fiat
        }
    }
}

/// How a pair is routed by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairRoute {
    CryptoToFiat,
    FiatToCrypto,
    CryptoToCrypto,
    FiatOnly,
}

impl PairRoute {
    pub fn of(from: &str, to: &str) -> Self {
        match (AssetClass::from(from), AssetClass::from(to)) {
            (AssetClass::Crypto, AssetClass::Fiat) => PairRoute::CryptoToFiat,
            (AssetClass::Fiat, AssetClass::Crypto) => PairRoute::FiatToCrypto,
            (AssetClass::Crypto, AssetClass::Crypto) => PairRoute::CryptoToCrypto,
            (AssetClass::Fiat, AssetClass::Fiat) => PairRoute::FiatOnly,
        }
    }
}

pub fn is_crypto(code: &str) -> bool {
    CRYPTO_ASSETS.iter().any(|(ticker, _)| *ticker == code)
}

/// Market-data id for a crypto ticker, if the ticker is recognised.
pub fn asset_id(code: &str) -> Option<&'static str> {
    CRYPTO_ASSETS
        .iter()
        .find(|(ticker, _)| *ticker == code)
        .map(|(_, id)| *id)
}
