//! Integration Tests for the Transfer FSM
//!
//! Full attempts against the in-process `MockWallet`, covering the paths a
//! user can take through the wallet prompts.

#[cfg(test)]
mod integration_tests {
    use std::sync::Arc;

    use crate::registry::{AssetSelection, BSC_CHAIN_ID, ChainRegistry, ETHEREUM_CHAIN_ID};
    use crate::transfer::{FailureKind, StartOutcome, TransferOrchestrator, TransferState};
    use crate::wallet::{MockCall, MockWallet, SentTx, WalletError, WalletSessionAdapter};

    const RECIPIENT: &str = "0x9264e84Dcc5DFDf009F4cD14CdA70C59D7cb98fd";

    struct TestHarness {
        orchestrator: Arc<TransferOrchestrator>,
        wallet: Arc<MockWallet>,
    }

    impl TestHarness {
        fn new(wallet: MockWallet) -> Self {
            let wallet = Arc::new(wallet);
            let orchestrator = TransferOrchestrator::new(
                Arc::new(ChainRegistry::builtin()),
                WalletSessionAdapter::new(wallet.clone()),
                RECIPIENT,
            )
            .unwrap();
            Self {
                orchestrator: Arc::new(orchestrator),
                wallet,
            }
        }
    }

    // ========================================================================
    // Happy Path Tests
    // ========================================================================

    /// Every registered (chain, asset) pair pays the registry amount
    #[tokio::test]
    async fn test_every_pair_pays_from_fresh_wallet() {
        let registry = ChainRegistry::builtin();
        for chain in registry.list_chains() {
            for selection in chain.selections() {
                let harness = TestHarness::new(MockWallet::disconnected(BSC_CHAIN_ID));
                let orch = &harness.orchestrator;
                orch.select_chain(chain.id).unwrap();
                orch.select_asset(selection.clone()).unwrap();

                let outcome = orch.start().await;
                let Some(TransferState::Succeeded(hash)) = outcome.state() else {
                    panic!("{} on {}: {:?}", selection, chain.id, outcome);
                };

                let spec = chain.asset(&selection).unwrap();
                let expected =
                    crate::money::parse_amount(&spec.fixed_amount, spec.decimals).unwrap();
                let sent = harness.wallet.sent();
                assert_eq!(sent.len(), 1);
                match (&sent[0], spec.address) {
                    (SentTx::Native { amount, hash: h, chain_id, .. }, None) => {
                        assert_eq!(*amount, expected);
                        assert_eq!(h, hash);
                        assert_eq!(*chain_id, Some(chain.id));
                    }
                    (SentTx::Token { amount, contract, hash: h, chain_id, .. }, Some(address)) => {
                        assert_eq!(*amount, expected);
                        assert_eq!(*contract, address);
                        assert_eq!(h, hash);
                        assert_eq!(*chain_id, Some(chain.id));
                    }
                    (other, _) => panic!("wrong submission path: {:?}", other),
                }
            }
        }
    }

    #[tokio::test]
    async fn test_watch_channel_ends_on_terminal_snapshot() {
        let harness = TestHarness::new(MockWallet::connected(BSC_CHAIN_ID));
        let mut rx = harness.orchestrator.watch();
        assert_eq!(rx.borrow().state, TransferState::Idle);

        harness.orchestrator.start().await;

        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        assert_eq!(snapshot.attempt_id, 1);
        assert!(matches!(snapshot.state, TransferState::Succeeded(_)));
        assert_eq!(snapshot, harness.orchestrator.snapshot());
    }

    // ========================================================================
    // Re-entrancy Tests
    // ========================================================================

    #[tokio::test]
    async fn test_two_starts_yield_one_attempt() {
        let harness = TestHarness::new(MockWallet::disconnected(BSC_CHAIN_ID));
        let orch = &harness.orchestrator;

        let gate = harness.wallet.hold(MockCall::Connect);

        let (a, b, _) = tokio::join!(orch.start(), orch.start(), async {
            gate.entered().await;
            gate.release();
        });

        let finished = [&a, &b]
            .iter()
            .filter(|o| matches!(o, StartOutcome::Finished { .. }))
            .count();
        assert_eq!(finished, 1, "{:?} / {:?}", a, b);
        assert_eq!(harness.wallet.connect_count(), 1);
        assert_eq!(harness.wallet.token_count(), 1);
    }

    #[tokio::test]
    async fn test_start_after_success_runs_new_attempt() {
        let harness = TestHarness::new(MockWallet::connected(BSC_CHAIN_ID));
        let orch = &harness.orchestrator;

        let first = orch.start().await;
        let second = orch.start().await;

        let (Some(TransferState::Succeeded(h1)), Some(TransferState::Succeeded(h2))) =
            (first.state(), second.state())
        else {
            panic!("expected two successes");
        };
        assert_ne!(h1, h2);
        assert_eq!(orch.snapshot().attempt_id, 2);
        assert_eq!(harness.wallet.sent().len(), 2);
    }

    // ========================================================================
    // Failure Tests
    // ========================================================================

    #[tokio::test]
    async fn test_wallet_silently_stays_on_chain() {
        let harness = TestHarness::new(MockWallet::connected(BSC_CHAIN_ID));
        harness.wallet.set_switch_is_silent(true);
        harness.orchestrator.select_chain(ETHEREUM_CHAIN_ID).unwrap();

        let outcome = harness.orchestrator.start().await;
        let Some(TransferState::Failed { kind, .. }) = outcome.state() else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(*kind, FailureKind::ChainSwitchError);
        assert!(harness.wallet.sent().is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_during_switch_fails_connection() {
        let harness = TestHarness::new(MockWallet::connected(ETHEREUM_CHAIN_ID));
        let gate = harness.wallet.hold(MockCall::SwitchChain);

        let task = {
            let orch = harness.orchestrator.clone();
            tokio::spawn(async move { orch.start().await })
        };
        gate.entered().await;
        harness.wallet.disconnect();
        gate.release();

        let outcome = task.await.unwrap();
        let Some(TransferState::Failed { kind, .. }) = outcome.state() else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(*kind, FailureKind::ConnectionError);
        assert_eq!(harness.wallet.token_count(), 0);
    }

    #[tokio::test]
    async fn test_reverted_token_call_keeps_reason() {
        let harness = TestHarness::new(MockWallet::connected(BSC_CHAIN_ID));
        harness
            .wallet
            .fail_token(WalletError::ContractCallReverted(Some(
                "execution reverted: BEP20: transfer amount exceeds balance".into(),
            )));

        let outcome = harness.orchestrator.start().await;
        assert_eq!(
            outcome.state(),
            Some(&TransferState::Failed {
                kind: FailureKind::ContractCallReverted,
                message: "execution reverted: BEP20: transfer amount exceeds balance".into(),
            })
        );
    }

    #[tokio::test]
    async fn test_failure_then_reselect_then_success() {
        let harness = TestHarness::new(MockWallet::connected(BSC_CHAIN_ID));
        let orch = &harness.orchestrator;
        harness.wallet.fail_token(WalletError::InsufficientFunds(None));

        let outcome = orch.start().await;
        assert!(matches!(
            outcome.state(),
            Some(TransferState::Failed {
                kind: FailureKind::InsufficientFunds,
                ..
            })
        ));

        // Pay in BNB instead; the visible error clears on selection
        orch.select_asset(AssetSelection::Native).unwrap();
        assert_eq!(orch.state(), TransferState::Idle);

        let outcome = orch.start().await;
        assert!(matches!(outcome.state(), Some(TransferState::Succeeded(_))));
        assert_eq!(harness.wallet.native_count(), 1);
    }

    // ========================================================================
    // Selection Tests
    // ========================================================================

    #[tokio::test]
    async fn test_chain_change_keeps_selection_valid() {
        let harness = TestHarness::new(MockWallet::connected(BSC_CHAIN_ID));
        let orch = &harness.orchestrator;
        let registry = orch.registry().clone();

        for from in registry.list_chains() {
            for selection in from.selections() {
                for to in registry.list_chains() {
                    orch.select_chain(from.id).unwrap();
                    orch.select_asset(selection.clone()).unwrap();

                    let moved = orch.select_chain(to.id).unwrap();
                    assert_eq!(moved.chain_id, to.id);
                    assert!(to.supports(&moved.asset));
                }
            }
        }
    }
}
