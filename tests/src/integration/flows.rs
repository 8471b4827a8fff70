//! # Integration Test Flows
//!
//! Drives the composer, directory, store and verifier together through the
//! `MailRuntime` façade.
//!
//! ## Flows Tested
//!
//! 1. **Round trip**: registered sender, untouched body verifies `Valid`
//! 2. **Tamper**: edited body verifies `Tampered`
//! 3. **Identity**: unregistered keys and borrowed keys verify `Unverified`
//! 4. **Directory outages**: transient failures end in `Unverified`
//! 5. **Events**: every step is visible on the bus

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mail_runtime::{MailRuntime, RuntimeConfig, SendRequest};
    use shared_bus::{ChangeOrigin, EventFilter, EventTopic, MailEvent};
    use shared_types::{Classification, SEALED_PLACEHOLDER};
    use ts_02_identity_directory::{InMemoryDirectory, OfflineDirectory, RegistrationError};
    use ts_03_message_store::{InMemoryMessageStore, MessageStore};
    use ts_04_verification::{VerificationFailure, VERIFIED_REASON};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    const ALICE: &str = "alice@example.com";
    const BOB: &str = "bob@example.com";
    const MALLORY: &str = "mallory@example.com";
    const ALICE_KEY: &str = "0x1111111111111111111111111111111111111111";
    const MALLORY_KEY: &str = "0x2222222222222222222222222222222222222222";

    fn fast_config() -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.verification.retry_backoff_ms = 1;
        config
    }

    async fn runtime_with_alice(config: RuntimeConfig) -> MailRuntime {
        let runtime = MailRuntime::in_memory(config).unwrap();
        runtime.register(ALICE, ALICE_KEY).await.unwrap();
        runtime
    }

    fn mail(from: &str, body: &str) -> SendRequest {
        SendRequest {
            from: from.into(),
            to: BOB.into(),
            subject: "Quarterly report".into(),
            body: body.into(),
            sealed: false,
            signer_key: None,
        }
    }

    // =============================================================================
    // ROUND TRIP
    // =============================================================================

    /// Test: registered sender, unchanged body
    #[tokio::test]
    async fn test_untouched_message_is_valid() {
        let runtime = runtime_with_alice(fast_config()).await;
        let receipt = runtime.send_message(mail(ALICE, "Numbers attached.")).await.unwrap();
        assert!(receipt.delivered_to_recipient);
        assert!(receipt.stamp.is_some());

        runtime.sign_in(BOB);
        let outcome = runtime
            .verify_message(&receipt.message_id, "Numbers attached.")
            .await
            .unwrap();

        assert_eq!(outcome.classification, Classification::Valid);
        assert_eq!(outcome.reason, VERIFIED_REASON);
        assert_eq!(outcome.registered_owner.as_deref(), Some(ALICE));
        assert_eq!(Some(outcome.fresh_digest), receipt.digest);
        assert_eq!(runtime.inbox().unwrap()[0].classification, Classification::Valid);
    }

    /// Test: line ending and surrounding whitespace differences do not count as edits
    #[tokio::test]
    async fn test_canonicalization_tolerates_line_endings() {
        let runtime = runtime_with_alice(fast_config()).await;
        let receipt = runtime
            .send_message(mail(ALICE, "line one\nline two"))
            .await
            .unwrap();

        runtime.sign_in(BOB);
        let outcome = runtime
            .verify_message(&receipt.message_id, "  line one\r\nline two\n")
            .await
            .unwrap();
        assert!(outcome.is_valid());
    }

    // =============================================================================
    // TAMPER
    // =============================================================================

    /// Test: one changed character makes the message tampered
    #[tokio::test]
    async fn test_edited_body_is_tampered() {
        let runtime = runtime_with_alice(fast_config()).await;
        let receipt = runtime.send_message(mail(ALICE, "Pay 100 EUR.")).await.unwrap();

        runtime.sign_in(BOB);
        let outcome = runtime
            .verify_message(&receipt.message_id, "Pay 900 EUR.")
            .await
            .unwrap();

        assert_eq!(outcome.classification, Classification::Tampered);
        assert_eq!(outcome.failure, Some(VerificationFailure::ContentMismatch));
        assert_ne!(Some(outcome.fresh_digest), receipt.digest);
    }

    /// Test: a later clean verification overwrites an earlier verdict
    #[tokio::test]
    async fn test_classification_follows_latest_verification() {
        let runtime = runtime_with_alice(fast_config()).await;
        let receipt = runtime.send_message(mail(ALICE, "Pay 100 EUR.")).await.unwrap();
        runtime.sign_in(BOB);

        runtime.verify_message(&receipt.message_id, "Pay 900 EUR.").await.unwrap();
        assert_eq!(
            runtime.message(&receipt.message_id).unwrap().classification,
            Classification::Tampered
        );

        runtime.verify_message(&receipt.message_id, "Pay 100 EUR.").await.unwrap();
        assert_eq!(
            runtime.message(&receipt.message_id).unwrap().classification,
            Classification::Valid
        );
    }

    /// Test: verifying the recipient's copy leaves the sender's copy alone
    #[tokio::test]
    async fn test_write_back_only_touches_verifying_user() {
        let runtime = runtime_with_alice(fast_config()).await;
        let receipt = runtime.send_message(mail(ALICE, "hello")).await.unwrap();

        runtime.sign_in(BOB);
        runtime.verify_message(&receipt.message_id, "hello").await.unwrap();

        runtime.sign_in(ALICE);
        assert_eq!(runtime.sent().unwrap()[0].classification, Classification::Unclassified);
    }

    // =============================================================================
    // IDENTITY
    // =============================================================================

    /// Test: a key nobody registered
    #[tokio::test]
    async fn test_unregistered_key_is_unverified() {
        let runtime = runtime_with_alice(fast_config()).await;
        let mut request = mail(MALLORY, "Reset your password.");
        request.signer_key = Some(MALLORY_KEY.into());
        let receipt = runtime.send_message(request).await.unwrap();

        runtime.sign_in(BOB);
        let outcome = runtime
            .verify_message(&receipt.message_id, "Reset your password.")
            .await
            .unwrap();
        assert_eq!(outcome.classification, Classification::Unverified);
        assert_eq!(outcome.failure, Some(VerificationFailure::NotRegistered));
    }

    /// Test: an unregistered sender without a key sends unstamped mail
    #[tokio::test]
    async fn test_unstamped_message_is_unverified() {
        let runtime = runtime_with_alice(fast_config()).await;
        let receipt = runtime.send_message(mail(MALLORY, "hi")).await.unwrap();
        assert!(receipt.stamp.is_none());

        runtime.sign_in(BOB);
        let outcome = runtime.verify_message(&receipt.message_id, "hi").await.unwrap();
        assert_eq!(outcome.failure, Some(VerificationFailure::MissingStampMaterial));
    }

    /// Test: stamping with someone else's registered key
    #[tokio::test]
    async fn test_borrowed_key_is_identity_mismatch() {
        let runtime = runtime_with_alice(fast_config()).await;
        let mut request = mail(MALLORY, "Signed on behalf of alice@example.com");
        request.signer_key = Some(ALICE_KEY.into());
        let receipt = runtime.send_message(request).await.unwrap();

        runtime.sign_in(BOB);
        let outcome = runtime
            .verify_message(&receipt.message_id, "Signed on behalf of alice@example.com")
            .await
            .unwrap();
        assert_eq!(outcome.classification, Classification::Unverified);
        assert_eq!(outcome.failure, Some(VerificationFailure::IdentityMismatch));
        assert_eq!(outcome.registered_owner.as_deref(), Some(ALICE));
    }

    /// Test: the legacy substring check accepts an owner named in the body
    #[tokio::test]
    async fn test_legacy_identity_check_accepts_owner_in_body() {
        let mut config = fast_config();
        config.verification.legacy_identity_check = true;
        let runtime = runtime_with_alice(config).await;

        let mut request = mail(MALLORY, "Signed on behalf of alice@example.com");
        request.signer_key = Some(ALICE_KEY.into());
        let receipt = runtime.send_message(request).await.unwrap();

        runtime.sign_in(BOB);
        let outcome = runtime
            .verify_message(&receipt.message_id, "Signed on behalf of alice@example.com")
            .await
            .unwrap();
        assert_eq!(outcome.classification, Classification::Valid);
    }

    /// Test: content is judged before identity
    #[tokio::test]
    async fn test_edited_borrowed_key_reports_tampered() {
        let runtime = runtime_with_alice(fast_config()).await;
        let mut request = mail(MALLORY, "original");
        request.signer_key = Some(ALICE_KEY.into());
        let receipt = runtime.send_message(request).await.unwrap();

        runtime.sign_in(BOB);
        let outcome = runtime.verify_message(&receipt.message_id, "edited").await.unwrap();
        assert_eq!(outcome.classification, Classification::Tampered);
    }

    /// Test: registration rules surface through the runtime
    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let runtime = runtime_with_alice(fast_config()).await;

        let err = runtime.register(BOB, ALICE_KEY).await.unwrap_err();
        assert!(matches!(err, RegistrationError::AlreadyRegistered { .. }));

        let err = runtime.register("ALICE@example.com", MALLORY_KEY).await.unwrap_err();
        assert!(matches!(err, RegistrationError::AlreadyRegistered { .. }));

        let err = runtime.register(BOB, "0x123").await.unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidFormat { .. }));

        assert_eq!(runtime.registered_identities().await.unwrap().len(), 1);
    }

    // =============================================================================
    // DIRECTORY OUTAGES
    // =============================================================================

    /// Test: an unreachable directory ends in Unverified, never Valid
    #[tokio::test]
    async fn test_offline_directory_is_unverified() {
        let online = runtime_with_alice(fast_config()).await;
        let receipt = online.send_message(mail(ALICE, "hello")).await.unwrap();
        online.sign_in(ALICE);
        let record = online.sent().unwrap().remove(0);

        let store = Arc::new(InMemoryMessageStore::new());
        store.save_inbound(BOB, record).unwrap();
        let offline = MailRuntime::with_parts(
            fast_config(),
            Arc::new(OfflineDirectory::new()),
            store,
        )
        .unwrap();

        offline.sign_in(BOB);
        let outcome = offline.verify_message(&receipt.message_id, "hello").await.unwrap();
        assert_eq!(outcome.classification, Classification::Unverified);
        assert_eq!(outcome.failure, Some(VerificationFailure::DirectoryUnavailable));
    }

    /// Test: a slow directory only delays the verdict
    #[tokio::test(start_paused = true)]
    async fn test_latency_does_not_change_verdict() {
        let mut config = fast_config();
        config.directory.lookup_latency_ms = 1500;
        config.directory.seed_identities = vec![(ALICE.into(), ALICE_KEY.into())];
        let runtime = MailRuntime::in_memory(config).unwrap();

        let receipt = runtime.send_message(mail(ALICE, "hello")).await.unwrap();
        runtime.sign_in(BOB);
        let outcome = runtime.verify_message(&receipt.message_id, "hello").await.unwrap();
        assert!(outcome.is_valid());
    }

    // =============================================================================
    // SEALED MESSAGES
    // =============================================================================

    /// Test: sealed body stays hidden until the message verifies
    #[tokio::test]
    async fn test_sealed_message_revealed_only_when_valid() {
        let runtime = runtime_with_alice(fast_config()).await;
        let mut request = mail(ALICE, "launch codes");
        request.sealed = true;
        let receipt = runtime.send_message(request).await.unwrap();

        runtime.sign_in(BOB);
        runtime.verify_message(&receipt.message_id, "launch c0des").await.unwrap();
        let record = runtime.message(&receipt.message_id).unwrap();
        assert_eq!(record.visible_body(), SEALED_PLACEHOLDER);

        let opened = runtime.open_message(&receipt.message_id).await.unwrap();
        assert_eq!(opened.visible_body, SEALED_PLACEHOLDER);
        assert!(opened.verification.is_none());

        runtime.verify_message(&receipt.message_id, "launch codes").await.unwrap();
        let opened = runtime.open_message(&receipt.message_id).await.unwrap();
        assert_eq!(opened.visible_body, "launch codes");
    }

    // =============================================================================
    // EVENTS
    // =============================================================================

    /// Test: send and verify publish in order on the bus
    #[tokio::test]
    async fn test_event_sequence() {
        let runtime = MailRuntime::with_parts(
            fast_config(),
            Arc::new(InMemoryDirectory::new()),
            Arc::new(InMemoryMessageStore::new()),
        )
        .unwrap();
        let mut all = runtime.subscribe(EventFilter::all());
        let mut bob_only = runtime.subscribe(EventFilter::all().for_user(BOB));

        runtime.register(ALICE, ALICE_KEY).await.unwrap();
        let receipt = runtime.send_message(mail(ALICE, "hello")).await.unwrap();
        runtime.sign_in(BOB);
        runtime.verify_message(&receipt.message_id, "hello").await.unwrap();

        let topics: Vec<EventTopic> = all.drain().iter().map(MailEvent::topic).collect();
        assert_eq!(
            topics,
            vec![
                EventTopic::Directory,
                EventTopic::Mailbox,
                EventTopic::Mailbox,
                EventTopic::Composer,
                EventTopic::Mailbox,
                EventTopic::Verification,
            ]
        );

        // Events without a user pass every user filter; alice's mailbox change does not
        let bob_events = bob_only.drain();
        assert!(bob_events.iter().all(|e| e.user_id().map_or(true, |u| u == BOB)));
        let bob_mailbox_changes = bob_events
            .iter()
            .filter(|e| matches!(e, MailEvent::MailboxChanged { origin: ChangeOrigin::Local, .. }))
            .count();
        assert_eq!(bob_mailbox_changes, 2);
    }
}
