//! `BrokerDesk`: the one entry point the dashboard talks to
//!
//! Reads go through the fallback policy and come back tagged live or demo.
//! Writes require configured credentials and never fall back.

use crate::config::BrokerConfig;
use crate::credentials::{CredentialGate, CredentialSource, CredentialStore};
use crate::demo::DemoData;
use crate::errors::Result;
use crate::http::MonoioHttpsClient;
use crate::nd::rest::BrokerRestClient;
use crate::nd::types::*;
use crate::policy::{DataSource, FallbackPolicy, Sourced};
use crate::traits::HttpTransport;
use tracing::info;

pub struct BrokerDesk<T, S> {
    client: BrokerRestClient<T, S>,
    policy: FallbackPolicy<S>,
    demo: DemoData,
}

impl BrokerDesk<MonoioHttpsClient, CredentialSource> {
    /// Desk over HTTPS with the credential store named by `config`
    pub fn connect(config: BrokerConfig) -> Result<Self> {
        let transport = MonoioHttpsClient::new().with_timeout(config.timeout());
        let gate = CredentialGate::new(config.credential_source());
        Self::new(config, transport, gate)
    }
}

impl<T: HttpTransport, S: CredentialStore> BrokerDesk<T, S> {
    pub fn new(config: BrokerConfig, transport: T, gate: CredentialGate<S>) -> Result<Self> {
        let policy = FallbackPolicy::new(gate.clone())
            .with_fallback_on_auth_rejected(config.fallback_on_auth_rejected);
        let client = BrokerRestClient::new(config, transport, gate)?;

        info!("🖥️  Broker desk ready, data source: {:?}", policy.source());

        Ok(Self {
            client,
            policy,
            demo: DemoData,
        })
    }

    pub fn client(&self) -> &BrokerRestClient<T, S> {
        &self.client
    }

    pub fn is_configured(&self) -> bool {
        self.policy.gate().is_configured()
    }

    pub fn data_source(&self) -> DataSource {
        self.policy.source()
    }

    pub async fn broker_info(&self, begin: &str, end: &str, trade_type: TradeType) -> Result<Sourced<BrokerInfo>> {
        self.policy
            .resolve(
                "broker_info",
                |credential| async move { self.client.pinned(credential).broker_info(begin, end, trade_type).await },
                || self.demo.broker_info(),
            )
            .await
    }

    pub async fn sub_accounts(&self, uid: Option<&str>, page: PageRequest) -> Result<Sourced<Page<SubAccount>>> {
        self.policy
            .resolve(
                "sub_accounts",
                |credential| async move { self.client.pinned(credential).sub_accounts(uid, page).await },
                || self.demo.sub_accounts(),
            )
            .await
    }

    pub async fn api_keys(&self, uid: &str) -> Result<Sourced<Vec<ApiKeyInfo>>> {
        self.policy
            .resolve(
                "api_keys",
                |credential| async move { self.client.pinned(credential).api_keys(uid, None).await },
                || self.demo.api_keys(uid),
            )
            .await
    }

    /// Deposit list; demo rows are filtered by currency like the live query
    pub async fn deposits(&self, filter: &DepositQuery) -> Result<Sourced<Vec<DepositRecord>>> {
        self.policy
            .resolve(
                "deposits",
                |credential| async move { self.client.pinned(credential).deposits(filter).await },
                || {
                    self.demo
                        .deposits()
                        .into_iter()
                        .filter(|d| filter.currency.as_ref().is_none_or(|c| *c == d.currency))
                        .collect()
                },
            )
            .await
    }

    pub async fn withdrawal(&self, withdrawal_id: &str) -> Result<Sourced<Option<WithdrawalRecord>>> {
        self.policy
            .resolve(
                "withdrawal",
                |credential| async move { self.client.pinned(credential).withdrawal_detail(withdrawal_id).await.map(Some) },
                || self.demo.withdrawals().into_iter().find(|w| w.id == withdrawal_id),
            )
            .await
    }

    /// Demo withdrawal table; the broker API only offers per-id lookups
    pub fn demo_withdrawals(&self) -> Vec<WithdrawalRecord> {
        self.demo.withdrawals()
    }

    pub async fn transfer_detail(&self, order_id: &str) -> Result<Sourced<Option<TransferRecord>>> {
        self.policy
            .resolve(
                "transfer_detail",
                |credential| async move { self.client.pinned(credential).transfer_detail(order_id).await.map(Some) },
                || self.demo.transfers().into_iter().find(|t| t.order_id == order_id),
            )
            .await
    }

    pub async fn rebates(&self, begin: &str, end: &str, trade_type: TradeType) -> Result<Sourced<RebateReport>> {
        self.policy
            .resolve(
                "rebates",
                |credential| async move {
                    let download = self.client.pinned(credential).rebate_download(begin, end, trade_type).await?;
                    Ok(RebateReport {
                        download_url: Some(download.url),
                        records: Vec::new(),
                    })
                },
                || self.demo.rebates(),
            )
            .await
    }

    pub async fn trading_pairs(&self) -> Result<Sourced<Vec<TradingPair>>> {
        self.policy
            .resolve("trading_pairs", |_| self.client.trading_pairs(), || self.demo.trading_pairs())
            .await
    }

    pub async fn create_sub_account(&self, account_name: &str) -> Result<SubAccount> {
        self.policy.gate().require()?;
        self.client.create_sub_account(account_name).await
    }

    pub async fn create_api_key(&self, request: &CreateApiKeyRequest) -> Result<ApiKeyInfo> {
        self.policy.gate().require()?;
        self.client.create_api_key(request).await
    }

    pub async fn modify_api_key(&self, request: &ModifyApiKeyRequest) -> Result<ApiKeyInfo> {
        self.policy.gate().require()?;
        self.client.modify_api_key(request).await
    }

    pub async fn delete_api_key(&self, uid: &str, api_key: &str) -> Result<bool> {
        self.policy.gate().require()?;
        self.client.delete_api_key(uid, api_key).await
    }

    pub async fn submit_transfer(&self, request: &TransferRequest) -> Result<TransferResult> {
        self.policy.gate().require()?;
        info!(
            "💸 Transfer {} {} {:?} sub-account {} ({})",
            request.amount, request.currency, request.direction, request.special_uid, request.client_oid
        );
        self.client.transfer(request).await
    }
}
