//! CSV upload handlers

use std::path::Path;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use roster_core::{RosterError, UploadError, AUDIT_TARGET};
use tower_sessions::Session;
use tracing::info;

use crate::auth::SessionUser;
use crate::flash::{flash, take_flashes, FlashCategory};
use crate::templates::{render, UploadTemplate};
use crate::{AppState, WebResult};

/// Multipart field carrying the file
pub const FILE_FIELD: &str = "file";

struct UploadedFile {
    file_name: String,
    data: Bytes,
}

pub async fn upload_page(
    SessionUser(username): SessionUser,
    session: Session,
) -> WebResult<Html<String>> {
    let flashes = take_flashes(&session).await?;
    render(&UploadTemplate::new(username, flashes))
}

/// Save the uploaded CSV and import its rows.
///
/// A bad file name re-renders the form; import failures are reported as a
/// flash on the upload page and nothing is inserted.
pub async fn upload_submit(
    SessionUser(username): SessionUser,
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> WebResult<Response> {
    let upload = read_file_field(&mut multipart).await?;

    let (file_name, data) = match upload
        .ok_or(UploadError::MissingFile)
        .and_then(|file| Ok((csv_file_name(&file.file_name)?, file.data)))
    {
        Ok(parts) => parts,
        Err(e) => {
            RosterError::from(e).log();
            flash(
                &session,
                FlashCategory::Danger,
                "Invalid file format. Please upload a CSV file.",
            )
            .await?;
            let flashes = take_flashes(&session).await?;
            return Ok(render(&UploadTemplate::new(username, flashes))?.into_response());
        }
    };

    let path = state.upload_dir.join(&file_name);
    tokio::fs::write(&path, &data).await?;
    info!(
        target: AUDIT_TARGET,
        user = %username,
        file = %file_name,
        bytes = data.len(),
        "File uploaded"
    );

    match state.importer.import_csv(&path).await {
        Ok(summary) => {
            info!(
                target: AUDIT_TARGET,
                user = %username,
                file = %file_name,
                inserted = summary.inserted,
                "Employees imported"
            );
            flash(
                &session,
                FlashCategory::Success,
                "File uploaded and processed successfully.",
            )
            .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            let err = RosterError::from(e);
            err.log();
            flash(&session, FlashCategory::Danger, format!("Import failed: {}", err)).await?;
            Ok(Redirect::to("/upload").into_response())
        }
    }
}

async fn read_file_field(multipart: &mut Multipart) -> WebResult<Option<UploadedFile>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await?;
        return Ok(Some(UploadedFile { file_name, data }));
    }
    Ok(None)
}

/// Reduce a client-supplied name to a bare `.csv` file name
pub fn csv_file_name(raw: &str) -> Result<String, UploadError> {
    let name = Path::new(raw)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();

    if name.is_empty() {
        return Err(UploadError::MissingFile);
    }
    if !name.ends_with(".csv") {
        return Err(UploadError::InvalidExtension(name.to_string()));
    }
    Ok(name.to_string())
}
