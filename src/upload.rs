//! The upload pipeline: resolve, archive, sniff, stream, parse.

use std::fs::File;
use std::path::{Path, PathBuf};

use reqwest::blocking::{Body, Client};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::archive::create_temp_zip_archive;
use crate::config::{normalize_service_url, AppConfig};
use crate::errors::TransferError;
use crate::output;
use crate::sniff;

/// Upload parameters resolved from config and CLI input; immutable once built.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub source: PathBuf,
    pub filename: String,
    pub service_url: String,
    pub max_downloads: u32,
    pub max_days: u32,
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub user: String,
    pub pass: String,
}

/// Links extracted from the service response.
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub download_url: String,
    pub delete_url: Option<String>,
    pub status: StatusCode,
}

/// A finished upload plus any temp-archive removal failure that must surface
/// without discarding the links.
#[derive(Debug)]
pub struct TransferOutcome {
    pub result: TransferResult,
    pub cleanup_error: Option<TransferError>,
}

/// Uploads `source`, archiving it first when it is a directory. The temporary
/// archive is removed after the attempt regardless of how the upload went.
pub fn send_path(
    config: &AppConfig,
    source: &Path,
    filename_override: Option<String>,
) -> Result<TransferOutcome, TransferError> {
    let metadata = std::fs::metadata(source).map_err(|err| TransferError::NotFound {
        path: source.to_path_buf(),
        source: err,
    })?;

    let archive = if metadata.is_dir() {
        Some(create_temp_zip_archive(source)?)
    } else {
        None
    };
    let upload_path = archive.as_ref().map_or(source, |a| a.path());

    let filename = filename_override.unwrap_or_else(|| {
        upload_path
            .file_name()
            .map(|x| x.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("file"))
    });

    let request = TransferRequest {
        source: upload_path.to_path_buf(),
        filename,
        service_url: normalize_service_url(&config.url),
        max_downloads: config.downloads,
        max_days: config.days,
        credentials: credentials_from(config),
    };

    let uploaded = put_file(&request);

    let cleanup_error = archive.and_then(|archive| archive.remove().err());

    match uploaded {
        Ok(result) => Ok(TransferOutcome {
            result,
            cleanup_error,
        }),
        Err(err) => {
            // The upload failure stays primary; a removal failure only warns.
            if let Some(cleanup) = cleanup_error {
                tracing::warn!(error = %cleanup, "cleanup failed after unsuccessful upload");
            }
            Err(err)
        }
    }
}

fn credentials_from(config: &AppConfig) -> Option<Credentials> {
    if config.user.is_empty() || config.pass.is_empty() {
        return None;
    }
    Some(Credentials {
        user: config.user.clone(),
        pass: config.pass.clone(),
    })
}

/// Streams one file to `{service_url}/{filename}` and extracts the links.
pub fn put_file(request: &TransferRequest) -> Result<TransferResult, TransferError> {
    let mut file = File::open(&request.source)?;
    let size = file.metadata()?.len();
    let content_type = sniff::detect_content_type(&mut file)?;

    let target = format!("{}/{}", request.service_url, request.filename);
    tracing::debug!(target = %target, size, content_type = %content_type, "starting upload");

    // Large uploads outlive the default 30s request timeout.
    let client = Client::builder().timeout(None).build()?;

    let bar = output::upload_bar(size);
    let body = Body::sized(bar.wrap_read(file), size);

    let mut builder = client
        .put(&target)
        .header(CONTENT_TYPE, content_type)
        .body(body);

    if request.max_days > 0 {
        builder = builder.header("Max-Days", request.max_days.to_string());
    }
    if request.max_downloads > 0 {
        builder = builder.header("Max-Downloads", request.max_downloads.to_string());
    }
    if let Some(credentials) = &request.credentials {
        builder = builder.basic_auth(&credentials.user, Some(&credentials.pass));
    }

    let response = builder.send()?;
    bar.finish();

    let status = response.status();
    if status != StatusCode::OK {
        return Err(TransferError::UploadRejected(status));
    }

    let delete_url = response
        .headers()
        .get("X-Url-Delete")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .filter(|value| !value.is_empty());

    let download_url = response
        .text()
        .map_err(|err| {
            TransferError::Io(std::io::Error::new(std::io::ErrorKind::UnexpectedEof, err))
        })?
        .trim_end()
        .to_string();

    Ok(TransferResult {
        download_url,
        delete_url,
        status,
    })
}
