//! # File Store Integration Tests
//!
//! Two runtimes sharing one data directory behave like two mail clients on
//! the same account store.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use mail_runtime::{MailRuntime, RuntimeConfig, SendRequest};
    use shared_bus::{ChangeOrigin, EventFilter, EventTopic, MailEvent};
    use shared_types::Classification;

    const ALICE: &str = "alice@example.com";
    const BOB: &str = "bob@example.com";
    const ALICE_KEY: &str = "0x1111111111111111111111111111111111111111";

    fn config(dir: &std::path::Path) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.storage.data_dir = dir.to_path_buf();
        config.storage.watch_interval_ms = 10;
        config.verification.retry_backoff_ms = 1;
        config.directory.seed_identities = vec![(ALICE.into(), ALICE_KEY.into())];
        config
    }

    fn mail(body: &str) -> SendRequest {
        SendRequest {
            from: ALICE.into(),
            to: BOB.into(),
            subject: "Status".into(),
            body: body.into(),
            sealed: false,
            signer_key: None,
        }
    }

    /// Test: mail and verdicts survive a restart
    #[tokio::test]
    async fn test_mailboxes_persist_across_restart() {
        let dir = tempfile::tempdir().unwrap();

        let message_id = {
            let runtime = MailRuntime::with_file_store(config(dir.path())).unwrap();
            let receipt = runtime.send_message(mail("all green")).await.unwrap();
            runtime.sign_in(BOB);
            runtime.verify_message(&receipt.message_id, "all green").await.unwrap();
            receipt.message_id
        };

        let runtime = MailRuntime::with_file_store(config(dir.path())).unwrap();
        runtime.sign_in(BOB);
        let inbox = runtime.inbox().unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].id, message_id);
        assert_eq!(inbox[0].classification, Classification::Valid);

        runtime.sign_in(ALICE);
        assert_eq!(runtime.sent().unwrap()[0].id, message_id);
    }

    /// Test: a message sent by another client shows up and verifies here
    #[tokio::test]
    async fn test_message_from_other_client_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let alice_client = MailRuntime::with_file_store(config(dir.path())).unwrap();
        let bob_client = MailRuntime::with_file_store(config(dir.path())).unwrap();

        let receipt = alice_client.send_message(mail("see you at 3")).await.unwrap();

        bob_client.sign_in(BOB);
        let opened = bob_client.open_message(&receipt.message_id).await.unwrap();
        assert_eq!(opened.record.classification, Classification::Valid);
        assert_eq!(opened.visible_body, "see you at 3");
    }

    /// Test: the watcher reports another client's writes, not our own
    #[tokio::test]
    async fn test_watcher_reports_external_changes() {
        let dir = tempfile::tempdir().unwrap();
        let local = MailRuntime::with_file_store(config(dir.path())).unwrap();
        let remote = MailRuntime::with_file_store(config(dir.path())).unwrap();

        let mut external = local.subscribe(EventFilter::topics(vec![EventTopic::Mailbox]));
        let watcher = local.start_watcher().unwrap().expect("file-backed runtime");

        remote.send_message(mail("from the other device")).await.unwrap();

        let mut users = Vec::new();
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while users.len() < 2 {
            let event = tokio::time::timeout_at(deadline, external.recv())
                .await
                .expect("watcher did not report both mailboxes")
                .expect("bus closed");
            match event {
                MailEvent::MailboxChanged {
                    user_id,
                    origin: ChangeOrigin::External,
                    ..
                } => users.push(user_id),
                other => panic!("unexpected local event: {other:?}"),
            }
        }
        users.sort();
        assert_eq!(users, vec![ALICE.to_string(), BOB.to_string()]);
        watcher.abort();
    }
}
