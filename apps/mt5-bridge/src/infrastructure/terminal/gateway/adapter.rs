//! Gateway terminal adapter implementing `TerminalPort`.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::api_types::{
    GatewayAccountInfo, GatewayLastError, GatewayPosition, GatewaySymbolInfo, GatewayTick,
    GatewayTradeRequest, GatewayTradeResult, LoginBody, SelectBody,
};
use super::config::GatewayConfig;
use super::error::GatewayError;
use super::http_client::GatewayHttpClient;
use crate::application::ports::{
    AccountInfo, Credentials, SymbolInfo, TerminalError, TerminalLastError, TerminalPort, Tick,
    TradeResult,
};
use crate::domain::shared::Symbol;
use crate::domain::trading::{OrderRequest, PositionSnapshot};

/// Terminal reached through the JSON gateway process.
#[derive(Debug, Clone)]
pub struct GatewayTerminal {
    client: GatewayHttpClient,
}

impl GatewayTerminal {
    /// Create a new gateway terminal adapter.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: GatewayHttpClient::new(config)?,
        })
    }
}

#[async_trait]
impl TerminalPort for GatewayTerminal {
    async fn initialize(&self) -> Result<bool, TerminalError> {
        self.client
            .post(&["initialize"], &json!({}))
            .await
            .map_err(Into::into)
    }

    async fn login(&self, credentials: &Credentials) -> Result<bool, TerminalError> {
        let body = LoginBody {
            login: credentials.login,
            password: &credentials.password,
            server: &credentials.server,
        };
        self.client.post(&["login"], &body).await.map_err(Into::into)
    }

    async fn shutdown(&self) -> Result<(), TerminalError> {
        let _: Value = self.client.post(&["shutdown"], &json!({})).await?;
        Ok(())
    }

    async fn last_error(&self) -> Result<TerminalLastError, TerminalError> {
        let err: GatewayLastError = self.client.get(&["last_error"], &[]).await?;
        Ok(err.into())
    }

    async fn account_info(&self) -> Result<Option<AccountInfo>, TerminalError> {
        let info: Option<GatewayAccountInfo> = self.client.get(&["account_info"], &[]).await?;
        Ok(info.map(Into::into))
    }

    async fn symbol_info(&self, symbol: &Symbol) -> Result<Option<SymbolInfo>, TerminalError> {
        let info: Option<GatewaySymbolInfo> =
            self.client.get(&["symbols", symbol.as_str()], &[]).await?;
        Ok(info.map(Into::into))
    }

    async fn symbol_select(&self, symbol: &Symbol, enable: bool) -> Result<bool, TerminalError> {
        self.client
            .post(&["symbols", symbol.as_str(), "select"], &SelectBody { enable })
            .await
            .map_err(Into::into)
    }

    async fn symbol_info_tick(&self, symbol: &Symbol) -> Result<Option<Tick>, TerminalError> {
        let tick: Option<GatewayTick> = self
            .client
            .get(&["symbols", symbol.as_str(), "tick"], &[])
            .await?;
        Ok(tick.map(Into::into))
    }

    async fn positions_get(
        &self,
        symbol: Option<Symbol>,
    ) -> Result<Vec<PositionSnapshot>, TerminalError> {
        let query: Vec<(&str, &str)> = symbol
            .as_ref()
            .map(|s| vec![("symbol", s.as_str())])
            .unwrap_or_default();

        // The terminal answers null instead of an empty list on failure.
        let positions: Option<Vec<GatewayPosition>> =
            self.client.get(&["positions"], &query).await?;

        positions
            .unwrap_or_default()
            .into_iter()
            .map(|p| PositionSnapshot::try_from(p).map_err(TerminalError::from))
            .collect()
    }

    async fn order_send(
        &self,
        request: &OrderRequest,
    ) -> Result<Option<TradeResult>, TerminalError> {
        let body = GatewayTradeRequest::from(request);
        tracing::debug!(
            symbol = %body.symbol,
            action = body.action,
            type_filling = ?body.type_filling,
            "Sending order to gateway"
        );
        let result: Option<GatewayTradeResult> = self.client.post(&["orders"], &body).await?;
        Ok(result.map(Into::into))
    }
}
