//! Integration tests for events

#[cfg(test)]
mod tests {
    use pscaf_events::*;

    struct RunEmitter {
        tx: EventSender,
    }

    impl EventEmitter for RunEmitter {
        fn event_sender(&self) -> Option<&EventSender> {
            Some(&self.tx)
        }

        fn correlation_id(&self) -> Option<&str> {
            Some("run-1")
        }
    }

    #[tokio::test]
    async fn test_event_emitter() {
        let (tx, mut rx) = channel();

        tx.emit(AppEvent::General(GeneralEvent::warning_with_context(
            "artifact URL has no {version} placeholder",
            "https://example.org/platform.tar.gz",
        )));
        tx.emit_debug("test debug");

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first.event,
            AppEvent::General(GeneralEvent::Warning { context: Some(_), .. })
        ));
        assert_eq!(first.meta.level, EventLevel::Warn);

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second.event,
            AppEvent::General(GeneralEvent::DebugLog { .. })
        ));
        assert_eq!(second.meta.source, EventSource::GENERAL);
    }

    #[tokio::test]
    async fn test_dropped_receiver() {
        let (tx, rx) = channel();
        drop(rx);

        // Should not panic when receiver is dropped
        tx.emit_debug("ignored");
    }

    #[tokio::test]
    async fn test_correlation_id_is_stamped() {
        let (tx, mut rx) = channel();
        let emitter = RunEmitter { tx };

        emitter.emit_scaffold(ScaffoldEvent::NoRemotePatches);

        let message = rx.recv().await.unwrap();
        assert_eq!(message.meta.correlation_id.as_deref(), Some("run-1"));
        assert_eq!(message.meta.source, EventSource::SCAFFOLD);
        assert_eq!(message.meta.level, EventLevel::Info);
    }

    #[test]
    fn test_event_serialization() {
        let event = AppEvent::Scaffold(ScaffoldEvent::RemotePatchDownloading {
            description: "Fix menu".into(),
            url: "https://example.org/fix.patch".into(),
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["domain"], "scaffold");
        assert_eq!(json["event"]["type"], "remote_patch_downloading");
    }

    #[test]
    fn test_command_line_quotes_whitespace() {
        let args = vec!["-C".to_string(), "my build".to_string()];
        assert_eq!(
            ProcessEvent::command_line("git", &args),
            "git -C 'my build'"
        );
    }
}
