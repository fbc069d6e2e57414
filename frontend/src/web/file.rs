//! 文件选择与读取

use js_sys::Uint8Array;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Event, File, HtmlInputElement};

/// 选中的文件（已读入内存）
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// 从 `<input type="file">` 的 change 事件取出第一个文件
pub fn selected_file(ev: &Event) -> Option<File> {
    let input: HtmlInputElement = ev.target()?.dyn_into().ok()?;
    input.files()?.get(0)
}

pub async fn read_file(file: &File) -> Result<PickedFile, String> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("读取文件失败: {:?}", e))?;

    let mime = match file.type_() {
        t if t.is_empty() => "application/octet-stream".to_string(),
        t => t,
    };

    Ok(PickedFile {
        name: file.name(),
        mime,
        bytes: Uint8Array::new(&buffer).to_vec(),
    })
}
