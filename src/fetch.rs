use crate::error::DownloadFailure;
use futures_util::StreamExt;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing::debug;

pub fn http_client() -> reqwest::Client {
    reqwest::Client::new()
}

/// Stream `url` into `dest`, replacing whatever was there. Returns the number
/// of bytes written.
///
/// The destination is only created once the server answered with a success
/// status, so a 404 leaves an existing file alone. A failure mid-stream
/// leaves the partial file in place.
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<u64, DownloadFailure> {
    debug!(%url, dest = %dest.display(), "GET");
    let response = client.get(url).send().await?.error_for_status()?;

    let mut file = tokio::fs::File::create(dest).await?;
    let mut body = response.bytes_stream();
    let mut written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    debug!(bytes = written, dest = %dest.display(), "download complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn writes_payload_byte_for_byte() {
        let server = MockServer::start().await;
        let payload = "services:\n  api:\n    image: supallm/api\r\n";
        Mock::given(method("GET"))
            .and(path("/docker-compose.yml"))
            .respond_with(ResponseTemplate::new(200).set_body_string(payload))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("docker-compose.yml");
        let url = format!("{}/docker-compose.yml", server.uri());

        let written = download(&http_client(), &url, &dest).await.unwrap();

        assert_eq!(written, payload.len() as u64);
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), payload);
    }

    #[tokio::test]
    async fn overwrites_longer_existing_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.env.exemple"))
            .respond_with(ResponseTemplate::new(200).set_body_string("A=1\n"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join(".env");
        std::fs::write(&dest, "OLD_CONTENT_THAT_IS_MUCH_LONGER=yes\nX=2\n").unwrap();

        let url = format!("{}/.env.exemple", server.uri());
        download(&http_client(), &url, &dest).await.unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "A=1\n");
    }

    #[tokio::test]
    async fn error_status_fails_without_touching_dest() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join(".env");
        std::fs::write(&dest, "KEEP=1\n").unwrap();

        let url = format!("{}/.env.exemple", server.uri());
        let err = download(&http_client(), &url, &dest).await.unwrap_err();

        assert!(matches!(err, DownloadFailure::Http(_)));
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "KEEP=1\n");
    }

    #[tokio::test]
    async fn unwritable_destination_is_an_io_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("x"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("missing-dir").join(".env");

        let url = format!("{}/.env.exemple", server.uri());
        let err = download(&http_client(), &url, &dest).await.unwrap_err();

        assert!(matches!(err, DownloadFailure::Io(_)));
    }
}
