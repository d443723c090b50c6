//! Integration tests for net crate

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use pscaf_errors::{Error, NetworkError};
    use pscaf_events::{channel, AppEvent, DownloadEvent};
    use pscaf_net::*;
    use std::time::Duration;
    use tempfile::tempdir;

    fn client() -> NetClient {
        NetClient::new(NetConfig {
            retry_count: 0,
            retry_delay: Duration::from_millis(1),
            ..NetConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_download_file() {
        let server = MockServer::start();
        let (tx, mut rx) = channel();

        let content = b"platform archive bytes";
        let mock = server.mock(|when, then| {
            when.method(GET).path("/platform-1.0.tar.gz");
            then.status(200)
                .header("content-length", content.len().to_string())
                .body(content);
        });

        let temp = tempdir().unwrap();
        let dest = temp.path().join("artifact.tar.gz");
        let url = server.url("/platform-1.0.tar.gz");

        let result = download_file(&client(), &url, &dest, &tx).await.unwrap();

        mock.assert();
        assert_eq!(result.size, content.len() as u64);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), content);

        let mut saw_start = false;
        let mut saw_complete = false;
        while let Ok(message) = rx.try_recv() {
            match message.event {
                AppEvent::Download(DownloadEvent::Started { total_bytes, .. }) => {
                    assert_eq!(total_bytes, Some(content.len() as u64));
                    saw_start = true;
                }
                AppEvent::Download(DownloadEvent::Completed { .. }) => saw_complete = true,
                _ => {}
            }
        }
        assert!(saw_start);
        assert!(saw_complete);
    }

    #[tokio::test]
    async fn test_download_overwrites_existing_file() {
        let server = MockServer::start();
        let (tx, _rx) = channel();
        server.mock(|when, then| {
            when.method(GET).path("/fix.patch");
            then.status(200).body("new contents");
        });

        let temp = tempdir().unwrap();
        let dest = temp.path().join("fix.patch");
        tokio::fs::write(&dest, "stale contents that are longer")
            .await
            .unwrap();

        download_file(&client(), &server.url("/fix.patch"), &dest, &tx)
            .await
            .unwrap();
        assert_eq!(
            tokio::fs::read_to_string(&dest).await.unwrap(),
            "new contents"
        );
    }

    #[tokio::test]
    async fn test_http_error_leaves_no_file() {
        let server = MockServer::start();
        let (tx, mut rx) = channel();
        server.mock(|when, then| {
            when.method(GET).path("/missing.tar.gz");
            then.status(404);
        });

        let temp = tempdir().unwrap();
        let dest = temp.path().join("artifact.tar.gz");

        let err = download_file(&client(), &server.url("/missing.tar.gz"), &dest, &tx)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Network(NetworkError::HttpError { status: 404, .. })
        ));
        assert!(!dest.exists());

        let failed = std::iter::from_fn(|| rx.try_recv().ok()).any(|message| {
            matches!(message.event, AppEvent::Download(DownloadEvent::Failed { .. }))
        });
        assert!(failed);
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let (tx, _rx) = channel();
        let temp = tempdir().unwrap();
        let err = download_file(&client(), "not a url", &temp.path().join("x"), &tx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Network(NetworkError::InvalidUrl(_))));
    }
}
