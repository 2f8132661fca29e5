//! URL paths of console pages and of the actions they link to.

use urlencoding::encode;

/// Create/clone handler.
pub const CREATE_HANDLER_PATH: &str = "/api/backfill/create";

/// Status page route, in axum's path syntax.
pub const SHOW_PATH: &str = "/backfills/{id}";

/// Services index.
pub const SERVICES_PATH: &str = "/services";

/// Status page of a run.
pub fn show(id: i64) -> String {
    SHOW_PATH.replace("{id}", &id.to_string())
}

/// Endpoint that applies a single configuration field change.
pub fn update(id: i64) -> String {
    format!("/backfills/{}/update", id)
}

/// Cursor editor for one partition of a paused run.
pub fn edit_cursor(id: i64, partition_name: &str) -> String {
    format!(
        "/backfills/{}/partitions/{}/edit-cursor",
        id,
        encode(partition_name)
    )
}

/// Service page. The default variant is addressed without a variant segment.
pub fn service(service_name: &str, variant: &str) -> String {
    if variant == super::DEFAULT_VARIANT {
        format!("{}/{}", SERVICES_PATH, encode(service_name))
    } else {
        format!(
            "{}/{}/variants/{}",
            SERVICES_PATH,
            encode(service_name),
            encode(variant)
        )
    }
}

/// Create form prefilled from an existing run.
///
/// Default-variant runs are addressed as `/backfills/create/{service}/{id}`,
/// others as `/backfills/create/{service}/{variant}/{id}`.
pub fn clone_from(service_name: &str, variant: &str, id: i64) -> String {
    if variant == super::DEFAULT_VARIANT {
        format!("/backfills/create/{}/{}", encode(service_name), id)
    } else {
        format!(
            "/backfills/create/{}/{}/{}",
            encode(service_name),
            encode(variant),
            id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_path() {
        assert_eq!(show(12), "/backfills/12");
    }

    #[test]
    fn test_clone_path_default_variant() {
        assert_eq!(clone_from("franklin", "default", 3), "/backfills/create/franklin/3");
        assert_eq!(
            clone_from("franklin", "blue", 3),
            "/backfills/create/franklin/blue/3"
        );
    }

    #[test]
    fn test_edit_cursor_encodes_partition_name() {
        assert_eq!(
            edit_cursor(5, "-80 a/b"),
            "/backfills/5/partitions/-80%20a%2Fb/edit-cursor"
        );
    }

    #[test]
    fn test_service_path() {
        assert_eq!(service("franklin", "default"), "/services/franklin");
        assert_eq!(service("franklin", "blue"), "/services/franklin/variants/blue");
    }
}
