use std::{
    future::Future,
    path::{Component, Path, PathBuf},
};

use axum::extract::{Multipart, multipart::Field};
use futures::future::join_all;
use rand::Rng;
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, warn};

use crate::{
    features::photos::models::Photo,
    utilities::{config::Config, errors::AppError},
};

pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/png",
    "image/gif",
    "image/webp",
    "image/avif",
];

pub const PUBLIC_PREFIX: &str = "/uploads/";
pub const PHOTO_FIELD: &str = "fotos";
const PROPERTY_SEGMENT: &str = "imoveis";
const DEFAULT_EXTENSION: &str = ".jpg";
const FILENAME_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const FILENAME_SUFFIX_LEN: usize = 8;
const MULTIPART_SLACK_BYTES: usize = 1024 * 1024;

#[derive(Clone, Debug)]
pub struct UploadSettings {
    pub root: PathBuf,
    pub max_files_per_property: usize,
    pub max_file_size: usize,
}

impl UploadSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            root: config.upload_root.clone(),
            max_files_per_property: config.max_photos_per_property,
            max_file_size: config.max_photo_size_bytes,
        }
    }

    pub fn property_dir(&self, property_id: i64) -> PathBuf {
        self.root
            .join(PROPERTY_SEGMENT)
            .join(property_id.to_string())
    }

    /// Request body ceiling for the upload route.
    pub fn body_limit(&self) -> usize {
        self.max_files_per_property
            .saturating_mul(self.max_file_size)
            .saturating_add(MULTIPART_SLACK_BYTES)
    }

    /// Maps a public `/uploads/...` url to its file under the upload root.
    ///
    /// External urls and anything that would escape the root resolve to `None`.
    pub fn resolve_public_url(&self, url: &str) -> Option<PathBuf> {
        let relative = Path::new(url.strip_prefix(PUBLIC_PREFIX)?);
        let confined = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        if !confined || relative.as_os_str().is_empty() {
            return None;
        }

        Some(self.root.join(relative))
    }
}

pub fn public_url(property_id: i64, filename: &str) -> String {
    format!("{PUBLIC_PREFIX}{PROPERTY_SEGMENT}/{property_id}/{filename}")
}

/// Last path segment of a url, when it has one.
pub fn filename_of(url: &str) -> Option<String> {
    if !url.contains('/') {
        return None;
    }
    url.rsplit('/').next().map(ToOwned::to_owned)
}

fn extension_of(original_name: Option<&str>, head: &[u8]) -> String {
    let declared = original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

    match declared {
        Some(ext) => format!(".{ext}"),
        None => infer::get(head)
            .map(|kind| format!(".{}", kind.extension()))
            .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
    }
}

/// `{unix millis}-{8 base36 chars}{extension}`
pub fn generate_filename(original_name: Option<&str>, head: &[u8]) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..FILENAME_SUFFIX_LEN)
        .map(|_| FILENAME_ALPHABET[rng.random_range(0..FILENAME_ALPHABET.len())] as char)
        .collect();

    format!(
        "{}-{suffix}{}",
        chrono::Utc::now().timestamp_millis(),
        extension_of(original_name, head)
    )
}

fn describe_size(bytes: usize) -> String {
    const MB: usize = 1024 * 1024;
    if bytes >= MB && bytes % MB == 0 {
        format!("{}MB", bytes / MB)
    } else if bytes >= 1024 && bytes % 1024 == 0 {
        format!("{}KB", bytes / 1024)
    } else {
        format!("{bytes} bytes")
    }
}

pub fn check_quota(existing: usize, incoming: usize, max: usize) -> Result<(), AppError> {
    if existing.saturating_add(incoming) > max {
        return Err(AppError::UploadError(format!(
            "Cada imovel pode conter no maximo {max} fotos."
        )));
    }
    Ok(())
}

/// Removes files, logging failures instead of returning them.
pub async fn delete_files_safely<I>(paths: I)
where
    I: IntoIterator<Item = PathBuf>,
{
    let removals = paths.into_iter().map(|path| async move {
        if let Err(e) = fs::remove_file(&path).await {
            warn!("could not remove upload {}: {e}", path.display());
        } else {
            debug!("removed upload {}", path.display());
        }
    });

    join_all(removals).await;
}

/// Opens a fresh file for writing; an existing file is never truncated.
async fn create_upload_file(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
}

// -- =====================
// -- RECEIVING
// -- =====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub path: PathBuf,
    pub filename: String,
    pub original_name: Option<String>,
    pub size: u64,
}

/// Everything a photo multipart request carried.
#[derive(Debug, Default)]
pub struct ReceivedUpload {
    pub files: Vec<StoredFile>,
    pub description: Option<String>,
    pub url: Option<String>,
}

impl ReceivedUpload {
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|file| file.path.clone()).collect()
    }

    pub async fn discard(self) {
        delete_files_safely(self.paths()).await;
    }
}

fn read_error() -> AppError {
    AppError::InvalidFormData("Falha ao processar upload.".to_string())
}

/// Streams the photo files of a multipart request into the property's
/// directory. On any failure the files written so far are deleted before the
/// error is returned.
pub async fn receive(
    mut multipart: Multipart,
    settings: &UploadSettings,
    property_id: i64,
) -> Result<ReceivedUpload, AppError> {
    let mut received = ReceivedUpload::default();

    match receive_fields(&mut multipart, settings, property_id, &mut received).await {
        Ok(()) => Ok(received),
        Err(e) => {
            received.discard().await;
            Err(e)
        }
    }
}

async fn receive_fields(
    multipart: &mut Multipart,
    settings: &UploadSettings,
    property_id: i64,
    received: &mut ReceivedUpload,
) -> Result<(), AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("multipart stream error: {e}");
        read_error()
    })? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            PHOTO_FIELD => receive_file(field, settings, property_id, received).await?,
            "descricao" => received.description = Some(field.text().await.map_err(|_| read_error())?),
            "url" => received.url = Some(field.text().await.map_err(|_| read_error())?),
            _ => warn!("Unknown multipart field: {name}"),
        }
    }

    Ok(())
}

async fn receive_file(
    mut field: Field<'_>,
    settings: &UploadSettings,
    property_id: i64,
    received: &mut ReceivedUpload,
) -> Result<(), AppError> {
    let original_name = field.file_name().map(ToOwned::to_owned);
    let first = field.chunk().await.map_err(|_| read_error())?;

    // browsers submit an empty part for an untouched file input
    if first.is_none() && original_name.as_deref().is_none_or(str::is_empty) {
        return Ok(());
    }

    let allowed = field
        .content_type()
        .is_some_and(|mime| ALLOWED_MIME_TYPES.contains(&mime));
    if !allowed {
        return Err(AppError::UploadError(
            "Formato de arquivo nao suportado.".to_string(),
        ));
    }

    if received.files.len() >= settings.max_files_per_property {
        return Err(AppError::UploadError(format!(
            "Envie no maximo {} arquivos por requisicao.",
            settings.max_files_per_property
        )));
    }

    let directory = settings.property_dir(property_id);
    fs::create_dir_all(&directory).await?;

    let filename = generate_filename(original_name.as_deref(), first.as_deref().unwrap_or_default());
    let path = directory.join(&filename);
    let mut file = create_upload_file(&path).await?;

    // registered before writing so a failure below still reclaims the file
    received.files.push(StoredFile {
        path,
        filename,
        original_name,
        size: 0,
    });

    let too_large = || {
        AppError::UploadError(format!(
            "Cada arquivo deve ter no maximo {}.",
            describe_size(settings.max_file_size)
        ))
    };

    let mut size: u64 = 0;
    let mut next = first;
    while let Some(chunk) = next {
        size += chunk.len() as u64;
        if size > settings.max_file_size as u64 {
            return Err(too_large());
        }
        file.write_all(&chunk).await?;
        next = field.chunk().await.map_err(|_| read_error())?;
    }
    file.flush().await?;

    if let Some(stored) = received.files.last_mut() {
        stored.size = size;
    }

    Ok(())
}

// -- =====================
// -- PERSISTING
// -- =====================

/// Row operations the batch writer needs from the photo store.
pub trait PhotoRows {
    fn insert_photo(
        &self,
        property_id: i64,
        url: &str,
        description: Option<&str>,
    ) -> impl Future<Output = Result<Photo, AppError>> + Send;

    fn remove_photo(
        &self,
        property_id: i64,
        photo_id: i64,
    ) -> impl Future<Output = Result<bool, AppError>> + Send;
}

/// Inserts one photo row per stored file, in order.
///
/// When an insert fails, every file of the batch is deleted together with
/// the rows this call already inserted, then the insert's error is returned.
/// Cleanup failures are only logged.
pub async fn persist_batch<W>(
    writer: &W,
    property_id: i64,
    files: &[StoredFile],
    description: Option<&str>,
) -> Result<Vec<Photo>, AppError>
where
    W: PhotoRows + Sync,
{
    let mut created: Vec<Photo> = Vec::with_capacity(files.len());

    for file in files {
        let url = public_url(property_id, &file.filename);
        match writer.insert_photo(property_id, &url, description).await {
            Ok(photo) => created.push(photo),
            Err(e) => {
                warn!(
                    "photo insert {} of {} failed for property {property_id}, rolling back",
                    created.len() + 1,
                    files.len()
                );
                rollback(writer, property_id, files, &created).await;
                return Err(e);
            }
        }
    }

    Ok(created)
}

async fn rollback<W>(writer: &W, property_id: i64, files: &[StoredFile], created: &[Photo])
where
    W: PhotoRows + Sync,
{
    delete_files_safely(files.iter().map(|file| file.path.clone())).await;

    let removals = created.iter().map(|photo| async move {
        if let Err(e) = writer.remove_photo(property_id, photo.id).await {
            warn!("rollback could not remove photo {}: {e}", photo.id);
        }
    });

    join_all(removals).await;
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Mutex,
        atomic::{AtomicI64, AtomicUsize, Ordering},
    };

    use axum::{
        body::Body,
        extract::FromRequest,
        http::{Request, header},
    };

    use super::*;

    const BOUNDARY: &str = "X-IMOBILIARIA-BOUNDARY";

    fn settings(root: &Path) -> UploadSettings {
        UploadSettings {
            root: root.to_path_buf(),
            max_files_per_property: 10,
            max_file_size: 64,
        }
    }

    enum Part<'a> {
        File {
            name: &'a str,
            content_type: &'a str,
            data: &'a [u8],
        },
        Text(&'a str, &'a str),
    }

    async fn multipart(parts: &[Part<'_>]) -> Multipart {
        let mut body: Vec<u8> = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::File {
                    name,
                    content_type,
                    data,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"fotos\"; filename=\"{name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::builder()
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();

        Multipart::from_request(request, &()).await.unwrap()
    }

    fn jpeg(name: &str) -> Part<'_> {
        Part::File {
            name,
            content_type: "image/jpeg",
            data: b"\xFF\xD8\xFF\xE0 not really a jpeg",
        }
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[test]
    fn generated_filenames_keep_the_extension() {
        let name = generate_filename(Some("sala.PNG"), &[]);
        let (stamp, rest) = name.split_once('-').unwrap();

        assert!(stamp.parse::<i64>().is_ok());
        assert_eq!(rest.len(), FILENAME_SUFFIX_LEN + ".PNG".len());
        assert!(rest.ends_with(".PNG"));
        assert!(
            rest[..FILENAME_SUFFIX_LEN]
                .bytes()
                .all(|b| FILENAME_ALPHABET.contains(&b))
        );
    }

    #[test]
    fn extension_falls_back_to_content_then_jpg() {
        let png_header = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        assert_eq!(extension_of(Some("sem-extensao"), png_header), ".png");
        assert_eq!(extension_of(None, b"plain"), ".jpg");
        assert_eq!(extension_of(Some("weird.j/p"), b"plain"), ".jpg");
    }

    #[test]
    fn public_urls_resolve_under_the_root() {
        let settings = settings(Path::new("/srv/uploads"));

        assert_eq!(public_url(5, "foo.jpg"), "/uploads/imoveis/5/foo.jpg");
        assert_eq!(
            settings.resolve_public_url("/uploads/imoveis/5/foo.jpg"),
            Some(PathBuf::from("/srv/uploads/imoveis/5/foo.jpg"))
        );
        assert_eq!(settings.resolve_public_url("https://example.com/x.jpg"), None);
        assert_eq!(settings.resolve_public_url("/uploads/../etc/passwd"), None);
        assert_eq!(settings.resolve_public_url("/uploads/"), None);
    }

    #[test]
    fn filename_is_the_last_segment() {
        assert_eq!(
            filename_of("/uploads/imoveis/5/foo.jpg"),
            Some("foo.jpg".to_string())
        );
        assert_eq!(filename_of("foo.jpg"), None);
    }

    #[test]
    fn quota_counts_existing_photos() {
        assert!(check_quota(0, 10, 10).is_ok());
        assert!(check_quota(7, 3, 10).is_ok());

        let err = check_quota(8, 3, 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Upload error, Cada imovel pode conter no maximo 10 fotos."
        );
    }

    #[test]
    fn body_limit_covers_a_full_batch() {
        let settings = UploadSettings {
            root: PathBuf::from("uploads"),
            max_files_per_property: 10,
            max_file_size: 5 * 1024 * 1024,
        };
        assert_eq!(settings.body_limit(), 51 * 1024 * 1024);
        assert_eq!(describe_size(5 * 1024 * 1024), "5MB");
    }

    #[tokio::test]
    async fn receive_stores_files_and_text_fields() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let multipart = multipart(&[
            Part::Text("descricao", "Fachada"),
            jpeg("a.jpg"),
            jpeg("b.jpeg"),
        ])
        .await;

        let received = receive(multipart, &settings, 5).await.unwrap();

        assert_eq!(received.description.as_deref(), Some("Fachada"));
        assert_eq!(received.files.len(), 2);
        assert_eq!(received.files[0].original_name.as_deref(), Some("a.jpg"));
        assert!(received.files.iter().all(|file| file.path.exists()));
        assert!(received.files.iter().all(|file| file.size > 0));
        assert_eq!(files_in(&settings.property_dir(5)), 2);
    }

    #[tokio::test]
    async fn eleven_files_are_rejected_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let names: Vec<String> = (0..11).map(|i| format!("{i}.jpg")).collect();
        let parts: Vec<Part> = names.iter().map(|name| jpeg(name)).collect();

        let err = receive(multipart(&parts).await, &settings, 5)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::UploadError(ref m) if m == "Envie no maximo 10 arquivos por requisicao."));
        assert_eq!(files_in(&settings.property_dir(5)), 0);
    }

    #[tokio::test]
    async fn oversized_file_is_rejected_and_reclaimed() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let big = vec![0u8; 65];
        let multipart = multipart(&[
            jpeg("ok.jpg"),
            Part::File {
                name: "big.jpg",
                content_type: "image/jpeg",
                data: &big,
            },
        ])
        .await;

        let err = receive(multipart, &settings, 9).await.unwrap_err();

        assert!(matches!(err, AppError::UploadError(ref m) if m == "Cada arquivo deve ter no maximo 64 bytes."));
        assert_eq!(files_in(&settings.property_dir(9)), 0);
    }

    #[tokio::test]
    async fn unsupported_media_type_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let multipart = multipart(&[
            jpeg("ok.jpg"),
            Part::File {
                name: "doc.pdf",
                content_type: "application/pdf",
                data: b"%PDF-1.7",
            },
        ])
        .await;

        let err = receive(multipart, &settings, 3).await.unwrap_err();

        assert!(matches!(err, AppError::UploadError(ref m) if m == "Formato de arquivo nao suportado."));
        assert_eq!(files_in(&settings.property_dir(3)), 0);
    }

    /// In-memory photo store that fails the nth insert.
    struct FlakyRows {
        next_id: AtomicI64,
        inserts: AtomicUsize,
        fail_on: usize,
        rows: Mutex<Vec<Photo>>,
    }

    impl FlakyRows {
        fn failing_on(fail_on: usize) -> Self {
            Self {
                next_id: AtomicI64::new(1),
                inserts: AtomicUsize::new(0),
                fail_on,
                rows: Mutex::new(Vec::new()),
            }
        }

        fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }
    }

    impl PhotoRows for FlakyRows {
        fn insert_photo(
            &self,
            property_id: i64,
            url: &str,
            description: Option<&str>,
        ) -> impl Future<Output = Result<Photo, AppError>> + Send {
            let attempt = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
            let outcome = if attempt == self.fail_on {
                Err(AppError::InternalError("insert failed".to_string()))
            } else {
                let photo = Photo {
                    id: self.next_id.fetch_add(1, Ordering::SeqCst),
                    property_id,
                    url: url.to_string(),
                    description: description.map(ToOwned::to_owned),
                };
                self.rows.lock().unwrap().push(photo.clone());
                Ok(photo)
            };
            async move { outcome }
        }

        fn remove_photo(
            &self,
            property_id: i64,
            photo_id: i64,
        ) -> impl Future<Output = Result<bool, AppError>> + Send {
            let mut rows = self.rows.lock().unwrap();
            let before = rows.len();
            rows.retain(|photo| !(photo.id == photo_id && photo.property_id == property_id));
            let removed = rows.len() < before;
            async move { Ok(removed) }
        }
    }

    fn stored_files(dir: &Path, count: usize) -> Vec<StoredFile> {
        std::fs::create_dir_all(dir).unwrap();
        (0..count)
            .map(|i| {
                let filename = format!("{i}.jpg");
                let path = dir.join(&filename);
                std::fs::write(&path, b"jpeg").unwrap();
                StoredFile {
                    path,
                    filename,
                    original_name: None,
                    size: 4,
                }
            })
            .collect()
    }

    #[tokio::test]
    async fn batch_inserts_every_file_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let files = stored_files(dir.path(), 3);
        let rows = FlakyRows::failing_on(usize::MAX);

        let photos = persist_batch(&rows, 7, &files, Some("Quarto")).await.unwrap();

        assert_eq!(photos.len(), 3);
        assert_eq!(photos[2].url, "/uploads/imoveis/7/2.jpg");
        assert_eq!(photos[0].description.as_deref(), Some("Quarto"));
        assert_eq!(files_in(dir.path()), 3);
    }

    #[tokio::test]
    async fn failed_third_insert_rolls_back_rows_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let files = stored_files(dir.path(), 5);
        let rows = FlakyRows::failing_on(3);

        let err = persist_batch(&rows, 7, &files, None).await.unwrap_err();

        assert!(matches!(err, AppError::InternalError(ref m) if m == "insert failed"));
        assert_eq!(rows.inserts.load(Ordering::SeqCst), 3);
        assert_eq!(rows.len(), 0);
        assert_eq!(files_in(dir.path()), 0);
    }

    #[tokio::test]
    async fn deleting_missing_files_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        delete_files_safely(vec![dir.path().join("ghost.jpg")]).await;
    }

    #[tokio::test]
    async fn upload_files_never_overwrite_existing_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1700000000000-abcdefgh.jpg");
        std::fs::write(&path, b"first photo").unwrap();

        let err = create_upload_file(&path).await.unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::AlreadyExists);
        assert_eq!(std::fs::read(&path).unwrap(), b"first photo");
        assert!(create_upload_file(&dir.path().join("other.jpg")).await.is_ok());
    }
}
