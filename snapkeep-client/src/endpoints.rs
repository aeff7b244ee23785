//! Request factories for the snapkeep backend.
//!
//! Each function builds the [`RequestDescriptor`] for one endpoint.
//! Factories are pure: no I/O, no token access, no URL parsing. The only
//! fallible one is [`upload`], which enforces the metadata/file pairing
//! client-side so mismatched uploads never reach the wire.

use crate::descriptor::{BinaryPart, BodyEncoding, Method, ParamValue, RequestDescriptor};
use snapkeep_core::{CoreError, UploadItem};

/// Social login: exchanges a provider identity token for the session
/// token pair, returned in the response headers.
pub fn login(provider: &str, identity_token: &str) -> RequestDescriptor {
    RequestDescriptor::new(Method::Post, "/v1/auth")
        .with_header("Social-Provider", provider)
        .with_param("identityToken", identity_token)
}

/// Ends the server-side session.
pub fn logout() -> RequestDescriptor {
    RequestDescriptor::new(Method::Delete, "/v1/auth").authenticated()
}

/// One page of the screenshot library.
pub fn list_screenshots(page: u32, size: u32) -> RequestDescriptor {
    RequestDescriptor::new(Method::Get, "/v1/images")
        .with_query("page", page.to_string())
        .with_query("size", size.to_string())
        .authenticated()
}

/// Tag-filtered screenshot search. Tags are sent as repeated `tagNames`
/// query items in input order.
pub fn search_by_tags(page: u32, size: u32, tag_names: &[String]) -> RequestDescriptor {
    let mut descriptor = RequestDescriptor::new(Method::Get, "/v1/images/search")
        .with_query("page", page.to_string())
        .with_query("size", size.to_string())
        .authenticated();

    for name in tag_names {
        descriptor = descriptor.with_query("tagNames", name);
    }

    descriptor
}

/// Multipart screenshot upload.
///
/// `items` and `files` pair 1:1 by position. Every file part is renamed
/// to its item's (already sanitized) file name, so the metadata and the
/// part headers can never disagree about a name.
pub fn upload(
    items: Vec<UploadItem>,
    mut files: Vec<BinaryPart>,
) -> Result<RequestDescriptor, CoreError> {
    if items.len() != files.len() {
        return Err(CoreError::UploadMismatch {
            items: items.len(),
            files: files.len(),
        });
    }

    for (item, file) in items.iter().zip(files.iter_mut()) {
        file.file_name.clone_from(&item.file_name);
    }

    let metadata = serde_json::to_value(&items)?;

    Ok(RequestDescriptor::new(Method::Post, "/v1/images/upload")
        .with_param("uploadItems", metadata)
        .with_param("files", ParamValue::Files(files))
        .with_encoding(BodyEncoding::Multipart)
        .authenticated())
}

/// Deletes one screenshot.
pub fn delete_screenshot(id: i64) -> RequestDescriptor {
    RequestDescriptor::new(Method::Delete, format!("/v1/images/{id}")).authenticated()
}

/// All tags with their screenshot counts.
pub fn list_tags() -> RequestDescriptor {
    RequestDescriptor::new(Method::Get, "/v1/tags").authenticated()
}

/// Bookmarks one screenshot.
pub fn add_bookmark(screenshot_id: i64) -> RequestDescriptor {
    RequestDescriptor::new(Method::Post, format!("/v1/bookmarks/{screenshot_id}")).authenticated()
}

/// Removes one bookmark.
pub fn remove_bookmark(screenshot_id: i64) -> RequestDescriptor {
    RequestDescriptor::new(Method::Delete, format!("/v1/bookmarks/{screenshot_id}"))
        .authenticated()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn login_carries_provider_header_and_token_body() {
        let descriptor = login("APPLE", "id-token-1");

        assert_eq!(descriptor.method, Method::Post);
        assert_eq!(descriptor.path, "/v1/auth");
        assert_eq!(descriptor.header("Social-Provider"), Some("APPLE"));
        assert!(!descriptor.requires_auth);
        assert_eq!(
            descriptor.parameters.get("identityToken"),
            Some(&ParamValue::Text("id-token-1".to_string()))
        );
    }

    #[test]
    fn listing_and_search_paginate() {
        let listing = list_screenshots(2, 30);
        assert_eq!(listing.path, "/v1/images");
        assert_eq!(
            listing.query,
            vec![
                ("page".to_string(), "2".to_string()),
                ("size".to_string(), "30".to_string()),
            ]
        );
        assert!(listing.requires_auth);

        let search = search_by_tags(0, 30, &["travel".to_string(), "food".to_string()]);
        let tag_items: Vec<_> = search
            .query
            .iter()
            .filter(|(n, _)| n == "tagNames")
            .map(|(_, v)| v.as_str())
            .collect();
        assert_eq!(tag_items, vec!["travel", "food"]);
    }

    #[test]
    fn upload_rejects_mismatched_counts() {
        let items = vec![UploadItem::new("a.jpg", Utc::now(), false, Vec::new())];

        let err = upload(items, Vec::new());

        assert!(matches!(
            err,
            Err(CoreError::UploadMismatch { items: 1, files: 0 })
        ));
    }

    #[test]
    fn upload_renames_files_to_sanitized_item_names() {
        let items = vec![UploadItem::new("my shot.jpg", Utc::now(), false, Vec::new())];
        let files = vec![BinaryPart::jpeg("raw name.jpg", vec![0xFF, 0xD8])];

        let descriptor = upload(items, files).unwrap();

        assert_eq!(descriptor.encoding, BodyEncoding::Multipart);
        assert!(descriptor.requires_auth);
        match descriptor.parameters.get("files") {
            Some(ParamValue::Files(parts)) => {
                assert_eq!(parts[0].file_name, "my_shot.jpg");
            }
            other => panic!("Expected file parts, got {other:?}"),
        }
    }

    #[test]
    fn upload_metadata_is_a_json_array() {
        let items = vec![
            UploadItem::new("a.jpg", Utc::now(), true, vec!["travel".to_string()]),
            UploadItem::new("b.jpg", Utc::now(), false, Vec::new()),
        ];
        let files = vec![
            BinaryPart::jpeg("a.jpg", vec![1]),
            BinaryPart::jpeg("b.jpg", vec![2]),
        ];

        let descriptor = upload(items, files).unwrap();

        match descriptor.parameters.get("uploadItems") {
            Some(ParamValue::Json(serde_json::Value::Array(entries))) => {
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0]["fileName"], "a.jpg");
                assert_eq!(entries[0]["isBookmarked"], true);
            }
            other => panic!("Expected JSON array metadata, got {other:?}"),
        }
    }

    #[test]
    fn id_endpoints_embed_the_id_in_the_path() {
        assert_eq!(delete_screenshot(42).path, "/v1/images/42");
        assert_eq!(add_bookmark(7).path, "/v1/bookmarks/7");
        assert_eq!(remove_bookmark(7).path, "/v1/bookmarks/7");
        assert_eq!(remove_bookmark(7).method, Method::Delete);
    }
}
