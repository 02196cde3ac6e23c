//! Bucket and object handlers backed by object storage.

use crate::error::AppError;
use crate::model::UploadedFile;
use crate::response::{message, message_with_data, ok};
use crate::state::AppState;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, State};
use axum::response::IntoResponse;

/// Multipart field that carries the upload.
pub const FILE_FIELD: &str = "file";
pub const NO_FILE: &str = "Nenhum arquivo enviado";
pub const FILE_UPLOADED: &str = "Arquivo enviado com sucesso";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

pub async fn list_buckets(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let buckets = state
        .objects
        .list_buckets()
        .await
        .map_err(state.fail("Erro ao listar buckets"))?;
    Ok(ok(buckets))
}

pub async fn list_objects(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let objects = state
        .objects
        .list_objects(&bucket)
        .await
        .map_err(state.fail("Erro ao listar objetos do bucket"))?;
    Ok(ok(objects))
}

/// POST /buckets/:bucketName/upload: multipart form with a `file` field. The object key is the
/// client-supplied file name, unchanged.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(bucket): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Ok(mut multipart) = multipart else {
        return Err(AppError::BadRequest(NO_FILE.into()));
    };
    let file = read_file_field(&mut multipart)
        .await?
        .ok_or_else(|| AppError::BadRequest(NO_FILE.into()))?;
    let receipt = state
        .objects
        .put_object(&bucket, file)
        .await
        .map_err(state.fail("Erro ao fazer upload do arquivo"))?;
    Ok(message_with_data(FILE_UPLOADED, receipt))
}

/// First `file` part that carries a file name, buffered in memory. Other parts are skipped.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let data = field.bytes().await?;
        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            data: data.to_vec(),
        }));
    }
    Ok(None)
}

pub async fn delete_object(
    State(state): State<AppState>,
    Path((bucket, file_name)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    state
        .objects
        .delete_object(&bucket, &file_name)
        .await
        .map_err(state.fail("Erro ao deletar arquivo"))?;
    Ok(message(format!("Arquivo {} deletado com sucesso", file_name)))
}
