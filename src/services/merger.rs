//! PDF 合并服务
//!
//! 按文件名排序合并输出目录中的所有 PDF。
//! 合并结果自身不会被再次读入。

use crate::error::MergeError;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 页面可以从父节点继承的属性
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// 合并时丢弃的结构对象，由新的页面树和目录替代
const STRUCTURAL_TYPES: [&[u8]; 7] = [b"Catalog", b"Pages", b"Page", b"Outlines", b"Outline", b"ObjStm", b"XRef"];

/// 合并结果
#[derive(Debug, Clone)]
pub struct MergeSummary {
    /// 合并文件路径
    pub path: PathBuf,
    /// 成功合并的文件（按合并顺序）
    pub merged: Vec<PathBuf>,
    /// 加载失败被跳过的文件
    pub skipped: Vec<PathBuf>,
    /// 总页数
    pub page_count: usize,
}

/// 列出待合并的 PDF（不含合并文件本身），按文件名升序
pub fn list_candidates(output_dir: &Path, final_name: &str) -> Result<Vec<PathBuf>, MergeError> {
    let entries = fs::read_dir(output_dir).map_err(|source| MergeError::ReadDir {
        dir: output_dir.to_path_buf(),
        source,
    })?;

    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .filter(|path| path.file_name().and_then(|n| n.to_str()) != Some(final_name))
        .collect();

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(candidates)
}

/// 合并输出目录中的 PDF 到 `output_dir/final_name`
///
/// 没有候选文件（或全部加载失败）时返回 `MergeError::NoInputs`，不写任何文件。
pub fn merge_directory(output_dir: &Path, final_name: &str) -> Result<MergeSummary, MergeError> {
    let candidates = list_candidates(output_dir, final_name)?;
    if candidates.is_empty() {
        return Err(MergeError::NoInputs {
            dir: output_dir.to_path_buf(),
        });
    }

    let mut documents = Vec::with_capacity(candidates.len());
    let mut merged = Vec::new();
    let mut skipped = Vec::new();

    for path in candidates {
        match Document::load(&path) {
            Ok(doc) => {
                debug!("已加载 {} ({} 页)", path.display(), doc.get_pages().len());
                documents.push(doc);
                merged.push(path);
            }
            Err(e) => {
                let err = MergeError::Load {
                    path: path.clone(),
                    message: e.to_string(),
                };
                warn!("⚠️ {}，已跳过", err);
                skipped.push(path);
            }
        }
    }

    if documents.is_empty() {
        return Err(MergeError::NoInputs {
            dir: output_dir.to_path_buf(),
        });
    }

    let mut document = merge_documents(documents);
    let page_count = document.get_pages().len();
    let path = output_dir.join(final_name);

    document.save(&path).map_err(|e| MergeError::Write {
        path: path.clone(),
        message: e.to_string(),
    })?;

    info!("✓ 已合并 {} 个文件，共 {} 页", merged.len(), page_count);

    Ok(MergeSummary {
        path,
        merged,
        skipped,
        page_count,
    })
}

/// 按顺序拼接多个文档的页面
pub fn merge_documents(documents: Vec<Document>) -> Document {
    let mut max_id = 1;
    let mut pages: Vec<(ObjectId, Dictionary)> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        pages.extend(collect_pages(&doc));
        objects.extend(doc.objects);
    }

    let mut merged = Document::with_version("1.5");
    for (id, object) in objects {
        if !type_name(&object).is_some_and(|name| STRUCTURAL_TYPES.contains(&name)) {
            merged.objects.insert(id, object);
        }
    }
    merged.max_id = max_id;

    let pages_id = merged.new_object_id();
    let kids: Vec<Object> = pages.iter().map(|(id, _)| Object::Reference(*id)).collect();
    let count = pages.len() as i64;

    for (id, mut page) in pages {
        page.set("Parent", Object::Reference(pages_id));
        merged.objects.insert(id, Object::Dictionary(page));
    }
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => Object::Name(b"Pages".to_vec()),
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );

    let catalog_id = merged.add_object(dictionary! {
        "Type" => Object::Name(b"Catalog".to_vec()),
        "Pages" => Object::Reference(pages_id),
    });
    merged.trailer.set("Root", Object::Reference(catalog_id));
    merged.compress();

    merged
}

/// 按页码顺序取出页面，并把继承属性写回页面本身
fn collect_pages(doc: &Document) -> Vec<(ObjectId, Dictionary)> {
    doc.get_pages()
        .into_values()
        .filter_map(|id| {
            let mut page = doc.get_dictionary(id).ok()?.clone();
            for key in INHERITABLE_KEYS {
                if page.has(key) {
                    continue;
                }
                if let Some(value) = inherited_value(doc, &page, key) {
                    page.set(key, value);
                }
            }
            Some((id, page))
        })
        .collect()
}

fn inherited_value(doc: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    // 防止损坏文件中的循环引用
    for _ in 0..64 {
        let node = doc.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    None
}

fn type_name(object: &Object) -> Option<&[u8]> {
    let dict = match object {
        Object::Dictionary(dict) => dict,
        Object::Stream(stream) => &stream.dict,
        _ => return None,
    };
    dict.get(b"Type").and_then(Object::as_name).ok()
}
