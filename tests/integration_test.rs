//! Integration Tests - End-to-end Session Testing
//!
//! Drives the Dashboard session through mock adapters for every port.
//! Uses mockall for trait mocking and tokio::test (paused clock) for
//! debounce and demo-latency timing.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use alloy::primitives::{Address, U256, address};
use chrono::Utc;
use mockall::mock;
use mockall::predicate::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tokio_test::assert_ok;

use aya_swap_engine::config::AppConfig;
use aya_swap_engine::config::loader::parse_config;
use aya_swap_engine::domain::pricing::{PriceTable, SimulatedPriceSource};
use aya_swap_engine::domain::quote::QuoteSource;
use aya_swap_engine::domain::session::{SessionMode, SessionState, StatusLevel, TradeInput};
use aya_swap_engine::domain::swap::{SWAP_LOG_CAPACITY, SwapError};
use aya_swap_engine::domain::token::TokenSymbol;
use aya_swap_engine::domain::valuation::DiversityClass;
use aya_swap_engine::ports::price_oracle::{OracleError, PriceOracle};
use aya_swap_engine::ports::signer::{SwapCall, TxReference};
use aya_swap_engine::usecases::advisor::AdvisorError;
use aya_swap_engine::usecases::dashboard::Dashboard;
use aya_swap_engine::usecases::quote_engine::{QuoteEngine, QuoteOutcome};

// ---- Mock Definitions ----

mock! {
    pub Oracle {}

    #[async_trait::async_trait]
    impl aya_swap_engine::ports::price_oracle::PriceOracle for Oracle {
        async fn amount_out(
            &self,
            from: TokenSymbol,
            to: TokenSymbol,
            amount_in: Decimal,
        ) -> Result<Decimal, OracleError>;
    }
}

mock! {
    pub Signer {}

    #[async_trait::async_trait]
    impl aya_swap_engine::ports::signer::SwapSigner for Signer {
        async fn address(&self) -> anyhow::Result<Address>;
        async fn sign_and_send(&self, call: &SwapCall) -> anyhow::Result<TxReference>;
    }
}

mock! {
    pub Balances {}

    #[async_trait::async_trait]
    impl aya_swap_engine::ports::balance_source::BalanceSource for Balances {
        async fn balance(&self, account: Address, token: TokenSymbol) -> anyhow::Result<Decimal>;
    }
}

mock! {
    pub Generator {}

    #[async_trait::async_trait]
    impl aya_swap_engine::ports::text_generator::TextGenerator for Generator {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
    }
}

/// Router stand-in whose first answer arrives late; later calls answer at once.
struct LaggingOracle {
    calls: AtomicUsize,
    first_delay: Duration,
}

impl LaggingOracle {
    fn new(first_delay: Duration) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            first_delay,
        }
    }
}

#[async_trait::async_trait]
impl PriceOracle for LaggingOracle {
    async fn amount_out(
        &self,
        _from: TokenSymbol,
        _to: TokenSymbol,
        amount_in: Decimal,
    ) -> Result<Decimal, OracleError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(self.first_delay).await;
        }
        Ok(amount_in * dec!(2990))
    }
}

type TestDashboard = Dashboard<MockOracle, MockSigner, MockBalances, MockGenerator>;

const ACCOUNT: Address = address!("abababababababababababababababababababab");

fn config(extra: &str) -> AppConfig {
    let toml = format!(
        r#"
[app]
name = "integration"

[chain]
rpc_url = "http://127.0.0.1:8545"

{extra}
"#
    );
    parse_config(&toml).expect("test config must parse")
}

/// Demo balances `{ETH: 10, DAI: 0}`.
fn demo_config() -> AppConfig {
    config(
        r#"
[demo.balances]
ETH = 10
WETH = 0
DAI = 0
USDC = 0
"#,
    )
}

fn idle_signer() -> MockSigner {
    let mut signer = MockSigner::new();
    signer.expect_sign_and_send().times(0);
    signer
}

fn wallet_signer() -> MockSigner {
    let mut signer = MockSigner::new();
    signer.expect_address().returning(|| Ok(ACCOUNT));
    signer
}

/// Chain balances: 2 ETH, 100 DAI, nothing else.
fn chain_balances() -> MockBalances {
    let mut balances = MockBalances::new();
    balances
        .expect_balance()
        .with(eq(ACCOUNT), always())
        .returning(|_, token| {
            Ok(match token {
                TokenSymbol::ETH => dec!(2),
                TokenSymbol::DAI => dec!(100),
                _ => Decimal::ZERO,
            })
        });
    balances
}

fn dashboard(
    config: &AppConfig,
    oracle: MockOracle,
    signer: MockSigner,
    balances: MockBalances,
) -> TestDashboard {
    Dashboard::new(
        config,
        Arc::new(oracle),
        Arc::new(signer),
        Arc::new(balances),
        Arc::new(MockGenerator::new()),
    )
    .expect("dashboard must build")
}

fn input(from: TokenSymbol, to: TokenSymbol, amount: &str) -> TradeInput {
    TradeInput {
        from,
        to,
        amount: amount.to_string(),
        slippage_percent: dec!(0.5),
    }
}

fn unreachable_oracle() -> MockOracle {
    let mut oracle = MockOracle::new();
    oracle.expect_amount_out().times(0);
    oracle
}

// ---- Quote Engine ----

#[tokio::test(start_paused = true)]
async fn test_live_quote_equals_oracle_value() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_amount_out()
        .with(eq(TokenSymbol::ETH), eq(TokenSymbol::USDC), eq(dec!(1.5)))
        .times(1)
        .returning(|_, _, _| Ok(dec!(4471.337812)));

    let session = dashboard(&config(""), oracle, wallet_signer(), chain_balances());
    assert_ok!(session.connect().await);

    let outcome = session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::USDC, "1.5"))
        .await;
    let QuoteOutcome::Ready(quote) = outcome else {
        panic!("expected a ready quote");
    };
    assert_eq!(quote.amount_out, dec!(4471.337812));
    assert_eq!(quote.source, QuoteSource::Live);

    let view = session.snapshot().await;
    assert_eq!(view.quote, Some(quote));
}

#[tokio::test(start_paused = true)]
async fn test_oracle_failure_falls_back_to_table() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_amount_out()
        .returning(|_, _, _| Err(OracleError::Unavailable("connection refused".into())));

    let session = dashboard(&config(""), oracle, wallet_signer(), chain_balances());
    assert_ok!(session.connect().await);

    let outcome = session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "2"))
        .await;
    let QuoteOutcome::Ready(quote) = outcome else {
        panic!("expected a ready quote");
    };
    assert_eq!(quote.amount_out, dec!(6000));
    assert_eq!(quote.source, QuoteSource::Simulated);
    // Fallback never reaches the user-visible status line as an error.
    let status = session.snapshot().await.status.expect("connect status");
    assert_eq!(status.level, StatusLevel::Info);
}

#[tokio::test(start_paused = true)]
async fn test_quote_idempotent_for_same_triple() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_amount_out()
        .times(2)
        .returning(|_, _, amount| Ok(amount * dec!(2990)));

    let session = dashboard(&config(""), oracle, wallet_signer(), chain_balances());
    assert_ok!(session.connect().await);

    let first = session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;
    let second = session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;

    match (first, second) {
        (QuoteOutcome::Ready(a), QuoteOutcome::Ready(b)) => {
            assert_eq!(a.amount_out, b.amount_out);
            assert_eq!(a.source, b.source);
            assert!(b.request_id > a.request_id);
        }
        other => panic!("expected two ready quotes, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn test_rapid_edits_collapse_to_one_oracle_call() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_amount_out()
        .with(always(), always(), eq(dec!(1.234)))
        .times(1)
        .returning(|_, _, _| Ok(dec!(3700)));

    let engine = QuoteEngine::new(
        Arc::new(oracle),
        SimulatedPriceSource::new(PriceTable::default()),
        Duration::from_millis(500),
    );
    let mode = SessionMode::Connected(ACCOUNT);

    let (a, b, c, d) = tokio::join!(
        engine.request_quote(mode, TokenSymbol::ETH, TokenSymbol::DAI, "1"),
        engine.request_quote(mode, TokenSymbol::ETH, TokenSymbol::DAI, "1.2"),
        engine.request_quote(mode, TokenSymbol::ETH, TokenSymbol::DAI, "1.23"),
        engine.request_quote(mode, TokenSymbol::ETH, TokenSymbol::DAI, "1.234"),
    );

    for stale in [a, b, c] {
        assert!(matches!(stale, QuoteOutcome::Superseded { .. }));
    }
    let QuoteOutcome::Ready(quote) = d else {
        panic!("latest edit must produce a quote");
    };
    assert_eq!(quote.request_id, 4);
    assert_eq!(quote.amount_out, dec!(3700));
}

#[tokio::test(start_paused = true)]
async fn test_invalid_amount_invalidates_in_flight_request() {
    let mut oracle = MockOracle::new();
    oracle.expect_amount_out().times(0);

    let engine = QuoteEngine::new(
        Arc::new(oracle),
        SimulatedPriceSource::new(PriceTable::default()),
        Duration::from_millis(500),
    );
    let mode = SessionMode::Connected(ACCOUNT);

    let (pending, cleared) = tokio::join!(
        engine.request_quote(mode, TokenSymbol::ETH, TokenSymbol::DAI, "3"),
        engine.request_quote(mode, TokenSymbol::ETH, TokenSymbol::DAI, "0"),
    );
    assert_eq!(pending, QuoteOutcome::Superseded { request_id: 1 });
    assert_eq!(cleared, QuoteOutcome::Cleared { request_id: 2 });
}

#[tokio::test(start_paused = true)]
async fn test_late_oracle_answer_for_older_edit_is_dropped() {
    let oracle = Arc::new(LaggingOracle::new(Duration::from_secs(2)));
    let engine = QuoteEngine::new(
        Arc::clone(&oracle),
        SimulatedPriceSource::new(PriceTable::default()),
        Duration::from_millis(500),
    );
    let mode = SessionMode::Connected(ACCOUNT);
    let started = tokio::time::Instant::now();

    let ((first, first_done), (second, second_done)) = tokio::join!(
        async {
            let outcome = engine
                .request_quote(mode, TokenSymbol::ETH, TokenSymbol::DAI, "1")
                .await;
            (outcome, started.elapsed())
        },
        async {
            // The first request is past its debounce and waiting on the router.
            tokio::time::sleep(Duration::from_millis(600)).await;
            let outcome = engine
                .request_quote(mode, TokenSymbol::ETH, TokenSymbol::DAI, "2")
                .await;
            (outcome, started.elapsed())
        },
    );

    assert_eq!(oracle.calls.load(Ordering::SeqCst), 2);
    assert!(first_done > second_done, "older answer must arrive last");
    assert_eq!(first, QuoteOutcome::Superseded { request_id: 1 });
    let QuoteOutcome::Ready(quote) = second.clone() else {
        panic!("newer edit must produce a quote");
    };
    assert_eq!(quote.request_id, 2);
    assert_eq!(quote.amount_out, dec!(5980));
    assert_eq!(quote.source, QuoteSource::Live);

    let mut state = SessionState::new();
    state.mode = mode;
    state.input.amount = "2".to_string();
    assert!(engine.commit(&mut state, second));
    assert!(!engine.commit(&mut state, first));
    assert_eq!(state.current_quote(), Some(&quote));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_edits_price_the_input_on_screen() {
    let cfg = config(
        r#"
[quote]
debounce_ms = 20
"#,
    );
    let session = Arc::new(dashboard(&cfg, unreachable_oracle(), idle_signer(), MockBalances::new()));
    session.enter_demo().await;

    let edits: Vec<_> = (1..=32)
        .map(|n| {
            let session = Arc::clone(&session);
            tokio::spawn(async move {
                session
                    .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, &n.to_string()))
                    .await
            })
        })
        .collect();
    for edit in edits {
        edit.await.expect("edit task completes");
    }

    let view = session.snapshot().await;
    let quote = view.quote.expect("the last written input is priced");
    assert_eq!(Some(quote.amount_in), view.input.amount.parse::<Decimal>().ok());
    assert_eq!(quote.request_id, session.latest_request());
}

#[tokio::test(start_paused = true)]
async fn test_demo_quotes_never_touch_oracle() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;

    let outcome = session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;
    assert!(matches!(
        outcome,
        QuoteOutcome::Ready(ref q) if q.source == QuoteSource::Simulated && q.amount_out == dec!(3000)
    ));
}

// ---- Swap Executor: preconditions ----

#[tokio::test(start_paused = true)]
async fn test_invalid_amounts_rejected() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;

    for amount in ["0", "-1", "1000001", "ten"] {
        session
            .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, amount))
            .await;
        assert_eq!(session.swap().await.unwrap_err(), SwapError::InvalidAmount, "{amount}");
    }

    let view = session.snapshot().await;
    assert!(view.swap_log.is_empty());
    assert_eq!(view.balances.get(TokenSymbol::ETH), dec!(10));
    assert_eq!(
        view.status.map(|s| s.text),
        Some("Please enter a valid amount between 0 and 1,000,000.".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_same_token_rejected_regardless_of_balance() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;

    for amount in ["1", "500"] {
        session
            .set_input(input(TokenSymbol::DAI, TokenSymbol::DAI, amount))
            .await;
        assert_eq!(session.swap().await.unwrap_err(), SwapError::SameTokenSwap);
    }
}

#[tokio::test(start_paused = true)]
async fn test_insufficient_balance_message() {
    let cfg = config(
        r#"
[demo.balances]
ETH = 5
"#,
    );
    let session = dashboard(&cfg, unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;
    session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "10"))
        .await;

    let err = session.swap().await.unwrap_err();
    assert_eq!(
        err,
        SwapError::InsufficientBalance {
            token: TokenSymbol::ETH,
            available: dec!(5),
            shortfall: dec!(5),
        }
    );
    let message = err.to_string();
    assert!(message.contains("5.0000 ETH"), "{message}");
}

#[tokio::test(start_paused = true)]
async fn test_slippage_above_policy_rejected() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;

    let mut trade = input(TokenSymbol::ETH, TokenSymbol::DAI, "1");
    trade.slippage_percent = dec!(12);
    session.set_input(trade).await;

    assert_eq!(
        session.swap().await.unwrap_err(),
        SwapError::InvalidSlippage(dec!(12))
    );
}

// ---- Swap Executor: demo execution ----

#[tokio::test(start_paused = true)]
async fn test_demo_swap_updates_balances_and_log() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;
    session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;

    let started = tokio::time::Instant::now();
    let record = session.swap().await.expect("demo swap succeeds");
    assert!(started.elapsed() >= Duration::from_millis(1500));

    assert_eq!(record.amount_in, dec!(1));
    assert_eq!(record.amount_out, dec!(3000));
    assert!(record.tx_reference.is_none());

    let view = session.snapshot().await;
    assert_eq!(view.balances.get(TokenSymbol::ETH), dec!(9));
    assert_eq!(view.balances.get(TokenSymbol::DAI), dec!(3000));
    assert_eq!(view.swap_log.first(), Some(&record));
    assert!(view.input.amount.is_empty());
    assert!(view.quote.is_none());
    assert_eq!(view.status.map(|s| s.text).as_deref(), Some("Swap successful!"));
}

#[tokio::test(start_paused = true)]
async fn test_session_readable_while_swap_confirms() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;
    session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;

    let (first, (pending_view, second)) = tokio::join!(session.swap(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let view = tokio::time::timeout(Duration::from_millis(1000), session.snapshot())
            .await
            .expect("snapshot must not wait for the swap");
        (view, session.swap().await)
    });

    assert!(pending_view.swap_pending);
    assert_eq!(pending_view.balances.get(TokenSymbol::ETH), dec!(10));
    assert_eq!(second.unwrap_err(), SwapError::SwapInProgress);

    let record = first.expect("first swap succeeds");
    let view = session.snapshot().await;
    assert!(!view.swap_pending);
    assert_eq!(view.balances.get(TokenSymbol::ETH), dec!(9));
    assert_eq!(view.swap_log.len(), 1);
    assert_eq!(view.swap_log.first(), Some(&record));
    assert_eq!(view.status.map(|s| s.text).as_deref(), Some("Swap successful!"));
}

#[tokio::test(start_paused = true)]
async fn test_mode_switch_during_demo_swap_keeps_new_balances() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;
    session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;

    let (result, ()) = tokio::join!(session.swap(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.disconnect().await;
    });

    let record = result.expect("simulated swap still completes");
    let view = session.snapshot().await;
    assert!(view.balances.is_empty());
    assert_eq!(view.swap_log.first(), Some(&record));
}

#[tokio::test(start_paused = true)]
async fn test_swap_log_capped_newest_first() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;

    let mut last = None;
    for _ in 0..(SWAP_LOG_CAPACITY + 2) {
        session
            .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "0.5"))
            .await;
        last = Some(session.swap().await.expect("demo swap succeeds"));
    }

    let view = session.snapshot().await;
    assert_eq!(view.swap_log.len(), SWAP_LOG_CAPACITY);
    assert_eq!(view.swap_log.first(), last.as_ref());
    assert_eq!(view.balances.get(TokenSymbol::ETH), dec!(4));
}

#[tokio::test(start_paused = true)]
async fn test_demo_valuation() {
    let cfg = config(
        r#"
[demo.balances]
ETH = 1
DAI = 1000
"#,
    );
    let session = dashboard(&cfg, unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;

    let valuation = session.snapshot().await.valuation;
    assert_eq!(valuation.total_value, dec!(4000));
    assert_eq!(valuation.per_token_percentage[&TokenSymbol::ETH], dec!(75.0));
    assert_eq!(valuation.per_token_percentage[&TokenSymbol::DAI], dec!(25.0));
    assert_eq!(valuation.diversity, DiversityClass::Medium);
}

// ---- Swap Executor: connected execution ----

#[tokio::test(start_paused = true)]
async fn test_connected_swap_submits_router_call() {
    let mut oracle = MockOracle::new();
    oracle.expect_amount_out().returning(|_, _, _| Ok(dec!(2987.5)));

    let mut signer = wallet_signer();
    signer
        .expect_sign_and_send()
        .withf(|call: &SwapCall| {
            let ttl = call.deadline - Utc::now();
            call.value == U256::from(1_000_000_000_000_000_000u128)
                && call.min_amount_out == U256::from(2_972_562_500_000_000_000_000u128)
                && call.path
                    == [
                        TokenSymbol::WETH.token().address,
                        TokenSymbol::DAI.token().address,
                    ]
                && call.recipient == ACCOUNT
                && ttl > chrono::Duration::minutes(14)
                && ttl <= chrono::Duration::minutes(15)
        })
        .times(1)
        .returning(|_| {
            Ok(TxReference {
                hash: "0xfeed".to_string(),
                block_number: Some(42),
            })
        });

    let session = dashboard(&config(""), oracle, signer, chain_balances());
    assert_ok!(session.connect().await);
    session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;

    let record = session.swap().await.expect("connected swap succeeds");
    assert_eq!(record.tx_reference.as_deref(), Some("0xfeed"));

    // Balances re-fetched from the chain, not mutated locally.
    let view = session.snapshot().await;
    assert_eq!(view.balances.get(TokenSymbol::ETH), dec!(2));
    assert_eq!(view.balances.get(TokenSymbol::DAI), dec!(100));
    assert_eq!(view.swap_log.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_connected_refuses_simulated_quote() {
    let mut oracle = MockOracle::new();
    oracle
        .expect_amount_out()
        .returning(|_, _, _| Err(OracleError::Reverted("INSUFFICIENT_LIQUIDITY".into())));

    let mut signer = wallet_signer();
    signer.expect_sign_and_send().times(0);

    let session = dashboard(&config(""), oracle, signer, chain_balances());
    assert_ok!(session.connect().await);
    session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;

    assert_eq!(session.swap().await.unwrap_err(), SwapError::QuoteUnavailable);
    assert!(session.snapshot().await.swap_log.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_connected_non_native_source_unsupported() {
    let mut oracle = MockOracle::new();
    oracle.expect_amount_out().returning(|_, _, _| Ok(dec!(0.033)));

    let mut signer = wallet_signer();
    signer.expect_sign_and_send().times(0);

    let session = dashboard(&config(""), oracle, signer, chain_balances());
    assert_ok!(session.connect().await);
    session
        .set_input(input(TokenSymbol::DAI, TokenSymbol::ETH, "100"))
        .await;

    assert_eq!(
        session.swap().await.unwrap_err(),
        SwapError::UnsupportedPath(TokenSymbol::DAI)
    );
}

#[tokio::test(start_paused = true)]
async fn test_connected_failure_keeps_balances() {
    let mut oracle = MockOracle::new();
    oracle.expect_amount_out().returning(|_, _, _| Ok(dec!(2990)));

    let mut signer = wallet_signer();
    signer
        .expect_sign_and_send()
        .times(1)
        .returning(|_| {
            Err(anyhow::anyhow!("user rejected transaction").context("Transaction rejected"))
        });

    let session = dashboard(&config(""), oracle, signer, chain_balances());
    assert_ok!(session.connect().await);
    session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;

    let err = session.swap().await.unwrap_err();
    assert_eq!(
        err,
        SwapError::ExecutionFailed("Transaction rejected: user rejected transaction".to_string())
    );

    let view = session.snapshot().await;
    assert_eq!(view.balances.get(TokenSymbol::ETH), dec!(2));
    assert!(view.swap_log.is_empty());
    let status = view.status.expect("error status");
    assert_eq!(status.level, StatusLevel::Error);
    assert_eq!(status.text, "Swap failed: Transaction rejected: user rejected transaction");
}

// ---- Session lifecycle ----

#[tokio::test(start_paused = true)]
async fn test_disconnected_has_no_quote() {
    let session = dashboard(&config(""), unreachable_oracle(), idle_signer(), MockBalances::new());

    let outcome = session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;
    assert!(matches!(outcome, QuoteOutcome::Cleared { .. }));
    assert_eq!(session.swap().await.unwrap_err(), SwapError::InsufficientBalance {
        token: TokenSymbol::ETH,
        available: Decimal::ZERO,
        shortfall: dec!(1),
    });
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_keeps_swap_log() {
    let session = dashboard(&demo_config(), unreachable_oracle(), idle_signer(), MockBalances::new());
    session.enter_demo().await;
    session
        .set_input(input(TokenSymbol::ETH, TokenSymbol::DAI, "1"))
        .await;
    assert_ok!(session.swap().await);

    session.disconnect().await;
    let view = session.snapshot().await;
    assert_eq!(view.mode, SessionMode::Disconnected);
    assert!(view.balances.is_empty());
    assert_eq!(view.swap_log.len(), 1);
}

// ---- Portfolio Advisor ----

#[tokio::test]
async fn test_assistant_requires_portfolio() {
    let session = dashboard(&config(""), unreachable_oracle(), idle_signer(), MockBalances::new());
    assert_eq!(
        session.ask(Some("How am I doing?")).await.unwrap_err(),
        AdvisorError::PortfolioUnavailable
    );
}

#[tokio::test(start_paused = true)]
async fn test_assistant_sees_demo_portfolio() {
    let mut generator = MockGenerator::new();
    generator
        .expect_generate()
        .withf(|prompt: &str| prompt.contains("ETH: 10.0000") && prompt.contains("Is ETH risky?"))
        .times(1)
        .returning(|_| Ok("You could consider hedging.".to_string()));

    let session = Dashboard::new(
        &demo_config(),
        Arc::new(unreachable_oracle()),
        Arc::new(idle_signer()),
        Arc::new(MockBalances::new()),
        Arc::new(generator),
    )
    .expect("dashboard must build");
    session.enter_demo().await;

    let answer = session.ask(Some("<Is ETH risky?>")).await;
    assert_eq!(answer.as_deref(), Ok("You could consider hedging."));
}
