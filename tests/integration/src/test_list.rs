//! Directory listing integration tests.

#[cfg(test)]
mod tests {
    use ephemeral_storage_client::{EphemeralStorageClient, StorageClient};

    use crate::{client, put};

    async fn populate(client: &EphemeralStorageClient) {
        let keys = [
            "photos/2024/jan/img1.jpg",
            "photos/2024/jan/img2.jpg",
            "photos/2024/feb/img3.jpg",
            "photos/2025/mar/img4.jpg",
            "documents/report.pdf",
            "documents/readme.txt",
            "root.txt",
        ];
        for key in keys {
            put(client, key, b"x").await;
        }
    }

    async fn list(client: &EphemeralStorageClient, prefix: Option<&str>) -> Vec<String> {
        client
            .list(prefix)
            .await
            .unwrap_or_else(|e| panic!("list {prefix:?} failed: {e}"))
    }

    #[tokio::test]
    async fn test_should_list_root_children() {
        let client = client();
        populate(&client).await;

        assert_eq!(list(&client, None).await, vec!["documents", "photos", "root.txt"]);
        assert_eq!(list(&client, Some("")).await, list(&client, Some("/")).await);
    }

    #[tokio::test]
    async fn test_should_list_one_level_only() {
        let client = client();
        populate(&client).await;

        assert_eq!(list(&client, Some("photos")).await, vec!["2024", "2025"]);
        assert_eq!(list(&client, Some("photos/2024")).await, vec!["feb", "jan"]);
        assert_eq!(
            list(&client, Some("/photos/2024/jan/")).await,
            vec!["img1.jpg", "img2.jpg"]
        );
    }

    #[tokio::test]
    async fn test_should_include_empty_directories() {
        let client = client();
        client
            .create_directory("docs/new")
            .await
            .unwrap_or_else(|e| panic!("create_directory failed: {e}"));
        put(&client, "docs/new/a.txt", b"A").await;
        put(&client, "docs/new/b.txt", b"B").await;

        assert_eq!(list(&client, Some("docs")).await, vec!["new"]);
        assert_eq!(list(&client, Some("docs/new")).await, vec!["a.txt", "b.txt"]);

        client
            .delete("docs/new")
            .await
            .unwrap_or_else(|e| panic!("delete failed: {e}"));
        assert!(!client.exists("docs/new/a.txt").await.unwrap_or(true));
        assert!(!client.exists("docs/new/b.txt").await.unwrap_or(true));
        assert!(list(&client, Some("docs/new")).await.is_empty());
        assert!(list(&client, Some("docs")).await.is_empty());
    }

    #[tokio::test]
    async fn test_should_merge_object_and_directory_with_same_name() {
        let client = client();
        put(&client, "mixed/item", b"object").await;
        put(&client, "mixed/item/child.txt", b"child").await;

        assert_eq!(list(&client, Some("mixed")).await, vec!["item"]);
        assert_eq!(list(&client, Some("mixed/item")).await, vec!["child.txt"]);
    }

    #[tokio::test]
    async fn test_should_not_match_sibling_with_shared_name_prefix() {
        let client = client();
        put(&client, "logs/app.log", b"1").await;
        put(&client, "logs-archive/old.log", b"2").await;

        assert_eq!(list(&client, Some("logs")).await, vec!["app.log"]);
    }

    #[tokio::test]
    async fn test_should_return_empty_for_unknown_prefix() {
        let client = client();
        populate(&client).await;

        assert!(list(&client, Some("nothing/here")).await.is_empty());
        assert!(list(&client, Some("root.txt")).await.is_empty());
    }

    #[tokio::test]
    async fn test_should_show_multipart_target_directory_before_finish() {
        let client = client();
        let _id = client
            .create_multipart_upload("uploads/2026/big.bin")
            .await
            .unwrap_or_else(|e| panic!("create failed: {e}"));

        assert_eq!(list(&client, Some("uploads")).await, vec!["2026"]);
        assert!(list(&client, Some("uploads/2026")).await.is_empty());
        assert!(!client.exists("uploads/2026/big.bin").await.unwrap_or(true));
    }
}
