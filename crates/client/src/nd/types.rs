//! Broker API wire types
//!
//! Field names follow the broker's camelCase JSON. Amounts stay decimal
//! strings on the wire and `Amount` in Rust.

use ndbroker_core::{Amount, ClientOid};
use serde::{Deserialize, Serialize};

/// Standard response envelope: `{"code":"200000","data":...}`
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub code: String,
    pub data: Option<T>,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Paged list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub current_page: u32,
    pub page_size: u32,
    pub total_num: u64,
    pub total_page: u32,
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// A single page holding every item
    pub fn single(items: Vec<T>) -> Self {
        let total_num = items.len() as u64;
        Self {
            current_page: 1,
            page_size: items.len().max(1) as u32,
            total_num,
            total_page: 1,
            items,
        }
    }
}

/// Page selector for list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub current_page: u32,
    pub page_size: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: 20,
        }
    }
}

/// Trade type selector for broker statistics and rebates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeType {
    Spot,
    Futures,
}

impl TradeType {
    /// Numeric code used in query strings
    pub fn code(&self) -> u8 {
        match self {
            TradeType::Spot => 1,
            TradeType::Futures => 2,
        }
    }
}

/// Broker overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerInfo {
    pub account_size: u64,
    #[serde(default)]
    pub max_account_size: Option<u64>,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubAccount {
    pub account_name: String,
    pub uid: String,
    pub created_at: u64,
    #[serde(default)]
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateSubAccountBody<'a> {
    pub account_name: &'a str,
}

/// API key of a sub-account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyInfo {
    pub uid: String,
    pub label: String,
    pub api_key: String,
    /// Only returned when the key is created
    #[serde(default)]
    pub secret_key: Option<String>,
    #[serde(default)]
    pub api_version: u32,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub ip_whitelist: Vec<String>,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApiKeyRequest {
    pub uid: String,
    pub passphrase: String,
    pub ip_whitelist: Vec<String>,
    pub permissions: Vec<String>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyApiKeyRequest {
    pub uid: String,
    pub api_key: String,
    pub ip_whitelist: Vec<String>,
    pub permissions: Vec<String>,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransferDirection {
    /// Broker account to sub-account
    Out,
    /// Sub-account to broker account
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Main,
    Trade,
}

/// Transfer between the broker account and a sub-account
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
    pub currency: String,
    pub amount: Amount,
    pub client_oid: ClientOid,
    pub direction: TransferDirection,
    pub account_type: AccountType,
    pub special_uid: String,
    pub special_account_type: AccountType,
}

impl TransferRequest {
    /// Build a transfer, validating the amount and generating a client order id
    pub fn new(
        currency: &str,
        amount: &str,
        direction: TransferDirection,
        sub_account_uid: &str,
    ) -> Result<Self, ndbroker_core::AmountError> {
        Ok(Self {
            currency: currency.to_ascii_uppercase(),
            amount: Amount::positive(amount)?,
            client_oid: ClientOid::new(),
            direction,
            account_type: AccountType::Main,
            special_uid: sub_account_uid.to_string(),
            special_account_type: AccountType::Main,
        })
    }

    pub fn with_client_oid(mut self, client_oid: ClientOid) -> Self {
        self.client_oid = client_oid;
        self
    }

    pub fn with_account_types(mut self, broker: AccountType, sub_account: AccountType) -> Self {
        self.account_type = broker;
        self.special_account_type = sub_account;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub order_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordStatus {
    Processing,
    WalletProcessing,
    Review,
    Success,
    Failure,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub order_id: String,
    pub currency: String,
    pub amount: Amount,
    pub from_uid: u64,
    pub from_account_type: String,
    #[serde(default)]
    pub from_account_tag: Option<String>,
    pub to_uid: u64,
    pub to_account_type: String,
    #[serde(default)]
    pub to_account_tag: Option<String>,
    pub status: RecordStatus,
    #[serde(default)]
    pub reason: Option<String>,
    pub created_at: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    pub uid: u64,
    pub hash: String,
    pub address: String,
    #[serde(default)]
    pub memo: Option<String>,
    pub amount: Amount,
    pub fee: Amount,
    pub currency: String,
    pub is_inner: bool,
    pub wallet_tx_id: String,
    pub status: RecordStatus,
    #[serde(default)]
    pub remark: Option<String>,
    pub chain: String,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Filters of the deposit list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepositQuery {
    pub currency: Option<String>,
    pub status: Option<RecordStatus>,
    pub hash: Option<String>,
    pub start_timestamp: Option<u64>,
    pub end_timestamp: Option<u64>,
    pub limit: Option<u32>,
}

impl DepositQuery {
    pub fn currency(mut self, currency: &str) -> Self {
        self.currency = Some(currency.to_ascii_uppercase());
        self
    }

    pub fn between(mut self, start_ms: u64, end_ms: u64) -> Self {
        self.start_timestamp = Some(start_ms);
        self.end_timestamp = Some(end_ms);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRecord {
    pub id: String,
    pub chain: String,
    pub wallet_tx_id: String,
    pub uid: u64,
    pub amount: Amount,
    #[serde(default)]
    pub memo: Option<String>,
    pub fee: Amount,
    pub address: String,
    #[serde(default)]
    pub remark: Option<String>,
    pub is_inner: bool,
    pub currency: String,
    pub status: RecordStatus,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Rebate statement location, as returned by the broker
///
/// The documented form is `{"url": ...}`; a bare URL string is also accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RebateDownloadWire")]
pub struct RebateDownload {
    pub url: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RebateDownloadWire {
    Link { url: String },
    Bare(String),
}

impl From<RebateDownloadWire> for RebateDownload {
    fn from(wire: RebateDownloadWire) -> Self {
        match wire {
            RebateDownloadWire::Link { url } | RebateDownloadWire::Bare(url) => Self { url },
        }
    }
}

/// One rebate line shown in the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RebateRecord {
    pub date: String,
    pub uid: String,
    pub trade_type: TradeType,
    pub currency: String,
    pub amount: Amount,
}

/// Rebate view: a download link when live, inline rows for demo data
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebateReport {
    pub download_url: Option<String>,
    pub records: Vec<RebateRecord>,
}

impl RebateReport {
    pub fn total(&self) -> Amount {
        self.records.iter().map(|r| r.amount).sum()
    }
}

/// Public trading pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingPair {
    pub symbol: String,
    pub name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub market: String,
    pub base_min_size: Amount,
    pub quote_min_size: Amount,
    pub base_increment: Amount,
    pub price_increment: Amount,
    pub enable_trading: bool,
}
