//! Order submission.
//!
//! Market opens walk the fill modes in order until the server accepts one;
//! closes and modifications are sent once.

use std::time::Duration;

use crate::application::dto::OpenPositionOutcome;
use crate::application::errors::TradeError;
use crate::application::ports::{TerminalPort, TradeResult};
use crate::domain::trading::{FillMode, OrderRequest};
use crate::observability::record_order_submission;

/// Submit `request` with each fill mode in turn.
///
/// Stops at the first success. An "unsupported filling mode" answer moves on
/// to the next mode after `retry_delay`; any other answer is final.
///
/// # Errors
///
/// Returns [`TradeError::Execution`] when the terminal rejects the request,
/// returns no result, or accepts none of the fill modes.
pub async fn submit_with_fill_fallback<T: TerminalPort + ?Sized>(
    terminal: &T,
    request: &OrderRequest,
    retry_delay: Duration,
) -> Result<OpenPositionOutcome, TradeError> {
    for (attempt, mode) in FillMode::FALLBACK_ORDER.into_iter().enumerate() {
        if attempt > 0 && !retry_delay.is_zero() {
            tokio::time::sleep(retry_delay).await;
        }

        let attempt_request = request.with_fill_mode(mode);
        let result = match terminal.order_send(&attempt_request).await {
            Ok(Some(result)) => result,
            Ok(None) => {
                record_order_submission(mode.as_str(), "no_result");
                return Err(no_result(terminal).await);
            }
            Err(e) => {
                record_order_submission(mode.as_str(), "error");
                return Err(e.into());
            }
        };

        if result.is_success() {
            record_order_submission(mode.as_str(), "success");
            tracing::info!(
                symbol = %request.symbol,
                fill_mode = %mode,
                retcode = %result.retcode,
                deal = result.deal,
                price = %result.price,
                "Order executed"
            );
            return Ok(OpenPositionOutcome {
                fill_mode: mode,
                result,
            });
        }

        if result.is_unsupported_fill_mode() {
            record_order_submission(mode.as_str(), "unsupported_fill");
            tracing::warn!(
                symbol = %request.symbol,
                fill_mode = %mode,
                comment = %result.comment,
                "Fill mode not supported, trying next"
            );
            continue;
        }

        record_order_submission(mode.as_str(), "rejected");
        tracing::error!(
            symbol = %request.symbol,
            fill_mode = %mode,
            retcode = %result.retcode,
            comment = %result.comment,
            "Order rejected"
        );
        return Err(TradeError::rejected(result));
    }

    Err(TradeError::execution("All filling modes failed"))
}

/// Submit `request` exactly once.
///
/// # Errors
///
/// Returns [`TradeError::Execution`] when the terminal rejects the request
/// or returns no result.
pub async fn submit_once<T: TerminalPort + ?Sized>(
    terminal: &T,
    request: &OrderRequest,
) -> Result<TradeResult, TradeError> {
    let mode = request.fill_mode.map_or("none", |m| m.as_str());

    let result = match terminal.order_send(request).await {
        Ok(Some(result)) => result,
        Ok(None) => {
            record_order_submission(mode, "no_result");
            return Err(no_result(terminal).await);
        }
        Err(e) => {
            record_order_submission(mode, "error");
            return Err(e.into());
        }
    };

    if result.is_success() {
        record_order_submission(mode, "success");
        Ok(result)
    } else {
        record_order_submission(mode, "rejected");
        tracing::error!(
            symbol = %request.symbol,
            position = ?request.position,
            retcode = %result.retcode,
            comment = %result.comment,
            "Request rejected"
        );
        Err(TradeError::rejected(result))
    }
}

async fn no_result<T: TerminalPort + ?Sized>(terminal: &T) -> TradeError {
    let last_error = match terminal.last_error().await {
        Ok(err) => err.to_string(),
        Err(e) => e.to_string(),
    };
    tracing::error!(last_error = %last_error, "Terminal returned no trade result");
    TradeError::execution(format!("order_send failed: {last_error}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockTerminalPort, TerminalLastError};
    use crate::domain::shared::{Symbol, Volume};
    use crate::domain::trading::{OrderDefaults, StopLevels, TradeRetcode, TradeSide};
    use mockall::Sequence;
    use rust_decimal_macros::dec;

    fn open_request() -> OrderRequest {
        OrderRequest::market_open(
            Symbol::new("XAUUSD"),
            TradeSide::Buy,
            Volume::new(dec!(0.1)).unwrap(),
            dec!(2000.10),
            StopLevels::default(),
            &OrderDefaults {
                deviation: 20,
                magic: 123_456,
                comment: "Bridge trade".to_string(),
            },
        )
    }

    fn result(retcode: TradeRetcode, comment: &str) -> TradeResult {
        TradeResult {
            retcode,
            deal: 77,
            order: 78,
            volume: dec!(0.1),
            price: dec!(2000.10),
            bid: dec!(2000.00),
            ask: dec!(2000.10),
            comment: comment.to_string(),
            request_id: 1,
        }
    }

    fn expect_mode(
        terminal: &mut MockTerminalPort,
        seq: &mut Sequence,
        mode: FillMode,
        answer: TradeResult,
    ) {
        terminal
            .expect_order_send()
            .withf(move |r| r.fill_mode == Some(mode))
            .times(1)
            .in_sequence(seq)
            .returning(move |_| Ok(Some(answer.clone())));
    }

    #[tokio::test]
    async fn falls_back_until_return_is_accepted() {
        let mut terminal = MockTerminalPort::new();
        let mut seq = Sequence::new();
        let unsupported = result(TradeRetcode::REJECT, "Unsupported filling mode");
        expect_mode(&mut terminal, &mut seq, FillMode::Fok, unsupported.clone());
        expect_mode(&mut terminal, &mut seq, FillMode::Ioc, unsupported);
        expect_mode(
            &mut terminal,
            &mut seq,
            FillMode::Return,
            result(TradeRetcode::DONE, "Request executed"),
        );

        let outcome = submit_with_fill_fallback(&terminal, &open_request(), Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(outcome.fill_mode, FillMode::Return);
        assert_eq!(outcome.result.retcode, TradeRetcode::DONE);
    }

    #[tokio::test]
    async fn first_success_stops_the_walk() {
        let mut terminal = MockTerminalPort::new();
        let mut seq = Sequence::new();
        expect_mode(
            &mut terminal,
            &mut seq,
            FillMode::Fok,
            result(TradeRetcode::DONE_PARTIAL, "Partial"),
        );

        let outcome = submit_with_fill_fallback(&terminal, &open_request(), Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(outcome.fill_mode, FillMode::Fok);
    }

    #[tokio::test]
    async fn other_rejection_is_final() {
        let mut terminal = MockTerminalPort::new();
        let mut seq = Sequence::new();
        expect_mode(
            &mut terminal,
            &mut seq,
            FillMode::Fok,
            result(TradeRetcode::NO_MONEY, "No money"),
        );

        let err = submit_with_fill_fallback(&terminal, &open_request(), Duration::ZERO)
            .await
            .unwrap_err();
        assert!(matches!(err, TradeError::Execution { result: Some(_), .. }));
    }

    #[tokio::test]
    async fn exhausting_modes_fails() {
        let mut terminal = MockTerminalPort::new();
        terminal
            .expect_order_send()
            .times(3)
            .returning(|_| {
                Ok(Some(result(
                    TradeRetcode::INVALID_FILL,
                    "Unsupported filling mode",
                )))
            });

        let err = submit_with_fill_fallback(&terminal, &open_request(), Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "All filling modes failed");
    }

    #[tokio::test]
    async fn null_result_reports_last_error() {
        let mut terminal = MockTerminalPort::new();
        terminal.expect_order_send().times(1).returning(|_| Ok(None));
        terminal.expect_last_error().returning(|| {
            Ok(TerminalLastError {
                code: -2,
                message: "Invalid arguments".to_string(),
            })
        });

        let err = submit_with_fill_fallback(&terminal, &open_request(), Duration::ZERO)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "order_send failed: (-2, 'Invalid arguments')"
        );
    }

    #[tokio::test]
    async fn submit_once_maps_rejection() {
        let mut terminal = MockTerminalPort::new();
        terminal
            .expect_order_send()
            .times(1)
            .returning(|_| {
                Ok(Some(result(TradeRetcode::INVALID_STOPS, "Invalid stops")))
            });

        let err = submit_once(&terminal, &open_request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Request rejected: Invalid stops (10016)");
    }
}
