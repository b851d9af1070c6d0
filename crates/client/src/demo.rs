//! Demo records served while the integration is unconfigured
//!
//! Shapes match live responses so the dashboard renders both the same way.

use crate::nd::types::*;
use ndbroker_core::Amount;

fn amount(s: &str) -> Amount {
    Amount::from_str_exact(s).unwrap_or_default()
}

/// Static demo catalogue, one accessor per dashboard feature
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoData;

impl DemoData {
    pub fn broker_info(&self) -> BrokerInfo {
        BrokerInfo {
            account_size: 3,
            max_account_size: Some(1_000),
            level: 1,
        }
    }

    pub fn sub_accounts(&self) -> Page<SubAccount> {
        Page::single(vec![
            SubAccount {
                account_name: "demo-market-maker".to_string(),
                uid: "226383154".to_string(),
                created_at: 1_704_067_200_000,
                level: 0,
            },
            SubAccount {
                account_name: "demo-retail-pool".to_string(),
                uid: "226383155".to_string(),
                created_at: 1_704_153_600_000,
                level: 0,
            },
            SubAccount {
                account_name: "demo-arbitrage".to_string(),
                uid: "226383156".to_string(),
                created_at: 1_704_240_000_000,
                level: 1,
            },
        ])
    }

    pub fn api_keys(&self, uid: &str) -> Vec<ApiKeyInfo> {
        vec![ApiKeyInfo {
            uid: uid.to_string(),
            label: "demo-trading-key".to_string(),
            api_key: "65a0c0ffee0000000000demo".to_string(),
            secret_key: None,
            api_version: 3,
            permissions: vec!["General".to_string(), "Spot".to_string()],
            ip_whitelist: vec!["203.0.113.10".to_string()],
            created_at: 1_704_326_400_000,
        }]
    }

    pub fn transfers(&self) -> Vec<TransferRecord> {
        vec![
            TransferRecord {
                order_id: "demo-transfer-0001".to_string(),
                currency: "USDT".to_string(),
                amount: amount("250"),
                from_uid: 165111215,
                from_account_type: "MAIN".to_string(),
                from_account_tag: Some("DEFAULT".to_string()),
                to_uid: 226383154,
                to_account_type: "MAIN".to_string(),
                to_account_tag: Some("DEFAULT".to_string()),
                status: RecordStatus::Success,
                reason: None,
                created_at: 1_704_412_800_000,
            },
            TransferRecord {
                order_id: "demo-transfer-0002".to_string(),
                currency: "BTC".to_string(),
                amount: amount("0.015"),
                from_uid: 226383155,
                from_account_type: "TRADE".to_string(),
                from_account_tag: None,
                to_uid: 165111215,
                to_account_type: "MAIN".to_string(),
                to_account_tag: Some("DEFAULT".to_string()),
                status: RecordStatus::Processing,
                reason: None,
                created_at: 1_704_499_200_000,
            },
        ]
    }

    pub fn deposits(&self) -> Vec<DepositRecord> {
        vec![
            DepositRecord {
                uid: 226383154,
                hash: "0xdemo5c1f2a9b0e7d4c3b2a1908f7e6d5c4b3a2910".to_string(),
                address: "0x9f8e7d6c5b4a39281706f5e4d3c2b1a098765432".to_string(),
                memo: None,
                amount: amount("1200"),
                fee: amount("0"),
                currency: "USDT".to_string(),
                is_inner: false,
                wallet_tx_id: "0xdemo5c1f2a9b0e7d4c3b2a1908f7e6d5c4b3a2910@0".to_string(),
                status: RecordStatus::Success,
                remark: None,
                chain: "ERC20".to_string(),
                created_at: 1_704_585_600_000,
                updated_at: 1_704_586_200_000,
            },
            DepositRecord {
                uid: 226383156,
                hash: "demo-btc-txid-7a6b5c4d3e2f1a0b".to_string(),
                address: "bc1qdemo0000000000000000000000000000000".to_string(),
                memo: None,
                amount: amount("0.05"),
                fee: amount("0"),
                currency: "BTC".to_string(),
                is_inner: false,
                wallet_tx_id: "demo-btc-txid-7a6b5c4d3e2f1a0b".to_string(),
                status: RecordStatus::Processing,
                remark: None,
                chain: "BTC".to_string(),
                created_at: 1_704_672_000_000,
                updated_at: 1_704_672_000_000,
            },
        ]
    }

    pub fn withdrawals(&self) -> Vec<WithdrawalRecord> {
        vec![WithdrawalRecord {
            id: "demo-withdrawal-0001".to_string(),
            chain: "TRC20".to_string(),
            wallet_tx_id: "demo-trx-9c8b7a6f5e4d3c2b".to_string(),
            uid: 226383155,
            amount: amount("300"),
            memo: None,
            fee: amount("1"),
            address: "TDemoAddr1111111111111111111111111".to_string(),
            remark: None,
            is_inner: false,
            currency: "USDT".to_string(),
            status: RecordStatus::Review,
            created_at: 1_704_758_400_000,
            updated_at: 1_704_758_400_000,
        }]
    }

    pub fn rebates(&self) -> RebateReport {
        RebateReport {
            download_url: None,
            records: vec![
                RebateRecord {
                    date: "20240101".to_string(),
                    uid: "226383154".to_string(),
                    trade_type: TradeType::Spot,
                    currency: "USDT".to_string(),
                    amount: amount("12.48"),
                },
                RebateRecord {
                    date: "20240102".to_string(),
                    uid: "226383155".to_string(),
                    trade_type: TradeType::Futures,
                    currency: "USDT".to_string(),
                    amount: amount("7.02"),
                },
            ],
        }
    }

    pub fn trading_pairs(&self) -> Vec<TradingPair> {
        vec![
            pair("BTC", "USDT", "0.00001", "0.1", "0.00000001", "0.1"),
            pair("ETH", "USDT", "0.0001", "0.1", "0.0000001", "0.01"),
            pair("KCS", "USDT", "0.01", "0.1", "0.0001", "0.001"),
        ]
    }
}

fn pair(base: &str, quote: &str, base_min: &str, quote_min: &str, base_inc: &str, price_inc: &str) -> TradingPair {
    TradingPair {
        symbol: format!("{base}-{quote}"),
        name: format!("{base}-{quote}"),
        base_currency: base.to_string(),
        quote_currency: quote.to_string(),
        market: quote.to_string(),
        base_min_size: amount(base_min),
        quote_min_size: amount(quote_min),
        base_increment: amount(base_inc),
        price_increment: amount(price_inc),
        enable_trading: true,
    }
}
