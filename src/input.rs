//! 解析対象画像の読み込み
//!
//! - 画像ファイル: バイト列をBase64化
//! - Data URL / Base64 を書いたテキストファイル、または `-`（標準入力）: 文字列として正規化

use crate::error::{LabelScanError, Result};
use label_scan_common::EncodedImage;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const STDIN_MARKER: &str = "-";

/// 標準入力から読んだ画像の退避先（拡張子なし）
const RETRY_FILE_STEM: &str = "last_input";

pub fn load_image(arg: &str) -> Result<EncodedImage> {
    if arg == STDIN_MARKER {
        let mut raw = String::new();
        std::io::stdin().read_to_string(&mut raw)?;
        return Ok(EncodedImage::new(&raw)?);
    }
    load_image_file(Path::new(arg))
}

pub fn load_image_file(path: &Path) -> Result<EncodedImage> {
    if !path.is_file() {
        return Err(LabelScanError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    if bytes.starts_with(b"data:image/") {
        let text = String::from_utf8(bytes)
            .map_err(|e| LabelScanError::ImageLoad(format!("{}: {}", path.display(), e)))?;
        return Ok(EncodedImage::new(&text)?);
    }

    Ok(EncodedImage::from_bytes(&bytes)?)
}

/// 解析に失敗した画像を再試行用に保存し、そのパスを返す
///
/// 標準入力の内容は再実行で読めないため、画像ファイルとして残す。
pub fn keep_for_retry(image: &EncodedImage, dir: &Path) -> Result<PathBuf> {
    let extension = match image.mime_type() {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    };
    let path = dir.join(format!("{}.{}", RETRY_FILE_STEM, extension));

    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, image.to_bytes()?)?;
    Ok(path)
}
