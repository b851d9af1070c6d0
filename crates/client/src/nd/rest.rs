//! Broker REST client
//!
//! - Credentials are read fresh through the gate on every signed call,
//!   unless the client is `pinned` to one snapshot
//! - Query strings and bodies are rendered once, then signed and sent as-is
//! - HTTP 401 becomes `AuthenticationRejected`; nothing is retried

use crate::config::BrokerConfig;
use crate::credentials::{Credential, CredentialGate, CredentialStore};
use crate::errors::{BrokerError, Result, SUCCESS_CODE};
use crate::http::{HttpRequest, HttpResponse};
use crate::nd::auth::{BrokerSigner, QueryString, SigningInput, HEADER_API_SIGN};
use crate::nd::types::*;
use crate::traits::HttpTransport;
use ndbroker_core::{log_error, log_request, mask_key, time_it, PerfTimer, RequestId};

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

pub const BROKER_INFO: &str = "/api/v1/broker/nd/info";
pub const SUB_ACCOUNT: &str = "/api/v1/broker/nd/account";
pub const SUB_ACCOUNT_API_KEY: &str = "/api/v1/broker/nd/account/apikey";
pub const SUB_ACCOUNT_UPDATE_API_KEY: &str = "/api/v1/broker/nd/account/update-apikey";
pub const TRANSFER: &str = "/api/v1/broker/nd/transfer";
pub const TRANSFER_DETAIL: &str = "/api/v3/broker/nd/transfer/detail";
pub const DEPOSIT_LIST: &str = "/api/v1/asset/ndbroker/deposit/list";
pub const DEPOSIT_DETAIL: &str = "/api/v3/broker/nd/deposit/detail";
pub const WITHDRAWAL_DETAIL: &str = "/api/v3/broker/nd/withdraw/detail";
pub const REBATE_DOWNLOAD: &str = "/api/v1/broker/nd/rebase/download";
pub const SYMBOLS: &str = "/api/v2/symbols";

/// Error body of rejected requests
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    msg: Option<String>,
}

/// Broker REST client over any `HttpTransport`
pub struct BrokerRestClient<T, S> {
    config: BrokerConfig,
    base_url: Url,
    transport: T,
    gate: CredentialGate<S>,
}

impl<T: HttpTransport, S: CredentialStore> BrokerRestClient<T, S> {
    /// The base URL must be an origin; a path prefix would change what gets signed
    pub fn new(config: BrokerConfig, transport: T, gate: CredentialGate<S>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.path() != "/" || base_url.query().is_some() {
            return Err(BrokerError::ConfigurationError(format!(
                "base URL must not carry a path or query: {}",
                config.base_url
            )));
        }

        debug!("🔗 Broker REST client created for {}", base_url);

        Ok(Self {
            config,
            base_url,
            transport,
            gate,
        })
    }

    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    pub fn gate(&self) -> &CredentialGate<S> {
        &self.gate
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_configured(&self) -> bool {
        self.gate.is_configured()
    }

    /// View of this client that signs every request with `credential`
    /// and never reads the store
    pub fn pinned(&self, credential: Credential) -> BrokerRestClient<&T, Credential> {
        BrokerRestClient {
            config: self.config.clone(),
            base_url: self.base_url.clone(),
            transport: &self.transport,
            gate: CredentialGate::new(credential),
        }
    }

    /// Broker overview for a date range (`yyyyMMdd`)
    pub async fn broker_info(&self, begin: &str, end: &str, trade_type: TradeType) -> Result<BrokerInfo> {
        let query = date_range_query(begin, end, trade_type)?;
        self.signed_get(BROKER_INFO, &query).await
    }

    pub async fn create_sub_account(&self, account_name: &str) -> Result<SubAccount> {
        let account_name = account_name.trim();
        if account_name.is_empty() {
            return Err(BrokerError::InvalidRequest("account name is empty".to_string()));
        }
        self.signed_post(SUB_ACCOUNT, &CreateSubAccountBody { account_name }).await
    }

    pub async fn sub_accounts(&self, uid: Option<&str>, page: PageRequest) -> Result<Page<SubAccount>> {
        let query = QueryString::new()
            .push_opt("uid", uid)
            .push("currentPage", page.current_page)
            .push("pageSize", page.page_size);
        self.signed_get(SUB_ACCOUNT, &query).await
    }

    pub async fn create_api_key(&self, request: &CreateApiKeyRequest) -> Result<ApiKeyInfo> {
        if request.label.trim().is_empty() || request.passphrase.trim().is_empty() {
            return Err(BrokerError::InvalidRequest("label and passphrase are required".to_string()));
        }
        self.signed_post(SUB_ACCOUNT_API_KEY, request).await
    }

    pub async fn api_keys(&self, uid: &str, api_key: Option<&str>) -> Result<Vec<ApiKeyInfo>> {
        let query = QueryString::new().push("uid", uid).push_opt("apiKey", api_key);
        self.signed_get(SUB_ACCOUNT_API_KEY, &query).await
    }

    pub async fn modify_api_key(&self, request: &ModifyApiKeyRequest) -> Result<ApiKeyInfo> {
        self.signed_post(SUB_ACCOUNT_UPDATE_API_KEY, request).await
    }

    pub async fn delete_api_key(&self, uid: &str, api_key: &str) -> Result<bool> {
        let query = QueryString::new().push("uid", uid).push("apiKey", api_key);
        self.send_signed("DELETE", SUB_ACCOUNT_API_KEY, &query, None).await
    }

    pub async fn transfer(&self, request: &TransferRequest) -> Result<TransferResult> {
        if !request.amount.is_positive() {
            return Err(BrokerError::InvalidRequest(format!(
                "transfer amount must be positive: {}",
                request.amount
            )));
        }
        self.signed_post(TRANSFER, request).await
    }

    pub async fn transfer_detail(&self, order_id: &str) -> Result<TransferRecord> {
        let query = QueryString::new().push("orderId", order_id);
        self.signed_get(TRANSFER_DETAIL, &query).await
    }

    pub async fn deposits(&self, filter: &DepositQuery) -> Result<Vec<DepositRecord>> {
        let status = filter
            .status
            .map(|s| serde_json::to_value(s).map(|v| v.as_str().unwrap_or_default().to_string()))
            .transpose()?;
        let query = QueryString::new()
            .push_opt("currency", filter.currency.as_deref())
            .push_opt("status", status)
            .push_opt("hash", filter.hash.as_deref())
            .push_opt("startTimestamp", filter.start_timestamp)
            .push_opt("endTimestamp", filter.end_timestamp)
            .push_opt("limit", filter.limit);
        self.signed_get(DEPOSIT_LIST, &query).await
    }

    pub async fn deposit_detail(&self, currency: &str, hash: &str) -> Result<DepositRecord> {
        let query = QueryString::new().push("currency", currency).push("hash", hash);
        self.signed_get(DEPOSIT_DETAIL, &query).await
    }

    pub async fn withdrawal_detail(&self, withdrawal_id: &str) -> Result<WithdrawalRecord> {
        let query = QueryString::new().push("withdrawalId", withdrawal_id);
        self.signed_get(WITHDRAWAL_DETAIL, &query).await
    }

    /// Download link of the rebate statement for a date range (`yyyyMMdd`)
    pub async fn rebate_download(&self, begin: &str, end: &str, trade_type: TradeType) -> Result<RebateDownload> {
        let query = date_range_query(begin, end, trade_type)?;
        self.signed_get(REBATE_DOWNLOAD, &query).await
    }

    /// Public symbol list; sent without authentication headers
    pub async fn trading_pairs(&self) -> Result<Vec<TradingPair>> {
        let request = HttpRequest::new("GET", &self.base_url, SYMBOLS);
        log_request!("GET", SYMBOLS, false);
        self.execute(request).await
    }

    /// Build a signed request without sending it
    ///
    /// When the gate reports unconfigured the request carries no auth
    /// headers at all.
    pub fn build_request(
        &self,
        method: &str,
        endpoint: &str,
        query: &QueryString,
        body: Option<String>,
    ) -> Result<HttpRequest> {
        let path_and_query = query.request_path(endpoint);
        let mut request = HttpRequest::new(method, &self.base_url, path_and_query.clone());

        match self.gate.load() {
            Some(credential) => {
                let signer = BrokerSigner::new(credential)?;
                let input = SigningInput::new(method, &path_and_query, body.as_deref());
                let headers = time_it!("sign request", { signer.sign(&input) })?;
                debug!(
                    "🔐 Signed {} {} with key {}",
                    input.method(),
                    path_and_query,
                    mask_key(&headers.api_key)
                );
                for (name, value) in headers.to_header_pairs() {
                    request = request.with_header(name, value);
                }
            }
            None => debug!("Credentials not configured, sending {} unsigned", path_and_query),
        }

        if let Some(body) = body {
            request = request
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        Ok(request)
    }

    async fn signed_get<R: DeserializeOwned>(&self, endpoint: &str, query: &QueryString) -> Result<R> {
        self.send_signed("GET", endpoint, query, None).await
    }

    async fn signed_post<B: Serialize, R: DeserializeOwned>(&self, endpoint: &str, body: &B) -> Result<R> {
        let body = serde_json::to_string(body)?;
        self.send_signed("POST", endpoint, &QueryString::new(), Some(body)).await
    }

    async fn send_signed<R: DeserializeOwned>(
        &self,
        method: &str,
        endpoint: &str,
        query: &QueryString,
        body: Option<String>,
    ) -> Result<R> {
        let request = self.build_request(method, endpoint, query, body)?;
        let signed = request.header(HEADER_API_SIGN).is_some();
        log_request!(request.method, request.path_and_query, signed);
        self.execute(request).await
    }

    async fn execute<R: DeserializeOwned>(&self, request: HttpRequest) -> Result<R> {
        let request_id = RequestId::next();
        let timer = self.config.enable_timing.then(|| {
            PerfTimer::start(format!("{} {} {}", request_id, request.method, request.path_and_query))
        });

        let response = match self.transport.send(&request).await {
            Ok(response) => response,
            Err(e) => {
                log_error!(format!("{} {}", request_id, request.url()), e);
                return Err(e);
            }
        };

        if let Some(timer) = timer {
            timer.log_elapsed();
        }
        debug!("{} answered {}", request_id, response.status);

        decode_response(response)
    }
}

/// `begin`/`end` as `yyyyMMdd` plus the numeric trade type
fn date_range_query(begin: &str, end: &str, trade_type: TradeType) -> Result<QueryString> {
    let begin_date = parse_day(begin)?;
    let end_date = parse_day(end)?;
    if end_date < begin_date {
        return Err(BrokerError::InvalidRequest(format!("end {end} is before begin {begin}")));
    }
    Ok(QueryString::new()
        .push("begin", begin)
        .push("end", end)
        .push("tradeType", trade_type.code()))
}

fn parse_day(day: &str) -> Result<NaiveDate> {
    if day.len() != 8 {
        return Err(BrokerError::InvalidRequest(format!("expected yyyyMMdd, got {day}")));
    }
    NaiveDate::parse_from_str(day, "%Y%m%d")
        .map_err(|_| BrokerError::InvalidRequest(format!("expected yyyyMMdd, got {day}")))
}

/// Classify a response: 401, other non-2xx, API envelope error, or data
pub fn decode_response<R: DeserializeOwned>(response: HttpResponse) -> Result<R> {
    if response.status == 401 {
        let parsed: Option<ErrorBody> = serde_json::from_str(&response.body).ok();
        let (code, message) = match parsed {
            Some(body) => (
                body.code.unwrap_or_else(|| "401".to_string()),
                body.msg.unwrap_or_else(|| "Unauthorized".to_string()),
            ),
            None => ("401".to_string(), response.body.clone()),
        };
        warn!("🚫 Broker rejected authentication (code {}): {}", code, message);
        return Err(BrokerError::AuthenticationRejected { code, message });
    }

    if !response.is_success() {
        return Err(BrokerError::HttpError(response.status, response.body));
    }

    let envelope: Envelope<R> = serde_json::from_str(&response.body)
        .map_err(|e| BrokerError::SerializationError(format!("{e}: {}", response.body)))?;

    if envelope.code != SUCCESS_CODE {
        return Err(BrokerError::Api {
            code: envelope.code,
            message: envelope.msg.unwrap_or_default(),
        });
    }

    match envelope.data {
        Some(data) => Ok(data),
        None => serde_json::from_value(serde_json::Value::Null)
            .map_err(|_| BrokerError::SerializationError("response carried no data".to_string())),
    }
}
