//! Multipart upload integration tests.

#[cfg(test)]
mod tests {
    use ephemeral_storage_client::{
        CompletedPart, EphemeralStorageClient, StorageClient, StorageErrorCode,
    };

    use crate::{body, client, put, read_all};

    async fn open(client: &EphemeralStorageClient, key: &str) -> String {
        client
            .create_multipart_upload(key)
            .await
            .unwrap_or_else(|e| panic!("create_multipart_upload {key}: {e}"))
    }

    async fn part(
        client: &EphemeralStorageClient,
        id: &str,
        key: &str,
        number: i32,
        data: &'static [u8],
    ) -> CompletedPart {
        client
            .upload_part(id, key, number, body(data))
            .await
            .unwrap_or_else(|e| panic!("upload part {number}: {e}"))
    }

    #[tokio::test]
    async fn test_should_complete_multipart_upload() {
        let client = client();
        let key = "docs/multipart.txt";
        let id = open(&client, key).await;

        let part1 = part(&client, &id, key, 1, b"chunk-").await;
        let part2 = part(&client, &id, key, 2, b"done").await;
        assert_eq!(part1.number, 1);
        assert_eq!(part2.number, 2);
        assert_ne!(part1.chunk_id, part2.chunk_id);

        client
            .finish_multipart_upload(&id, key, vec![part1, part2])
            .await
            .unwrap_or_else(|e| panic!("finish: {e}"));

        assert_eq!(read_all(&client, key).await.as_ref(), b"chunk-done");
        assert_eq!(client.size(key).await.unwrap_or(0), 10);
    }

    #[tokio::test]
    async fn test_should_assemble_in_part_number_order() {
        let client = client();
        let key = "ordered.bin";
        let id = open(&client, key).await;

        let p3 = part(&client, &id, key, 3, b"C").await;
        let p1 = part(&client, &id, key, 1, b"A").await;
        let p2 = part(&client, &id, key, 2, b"B").await;

        client
            .finish_multipart_upload(&id, key, vec![p2, p3, p1])
            .await
            .unwrap_or_else(|e| panic!("finish: {e}"));
        assert_eq!(read_all(&client, key).await.as_ref(), b"ABC");
    }

    #[tokio::test]
    async fn test_should_use_latest_reupload_of_a_part() {
        let client = client();
        let key = "replaced.txt";
        let id = open(&client, key).await;

        let stale = part(&client, &id, key, 1, b"old").await;
        let fresh = part(&client, &id, key, 1, b"new").await;
        assert_ne!(stale.chunk_id, fresh.chunk_id);

        let err = client
            .finish_multipart_upload(&id, key, vec![stale])
            .await
            .err();
        assert_eq!(
            err.map(|e| e.code()),
            Some(StorageErrorCode::InvalidMultipartChunk)
        );

        client
            .finish_multipart_upload(&id, key, vec![fresh])
            .await
            .unwrap_or_else(|e| panic!("finish: {e}"));
        assert_eq!(read_all(&client, key).await.as_ref(), b"new");
    }

    #[tokio::test]
    async fn test_should_drop_unreferenced_parts() {
        let client = client();
        let key = "subset.txt";
        let id = open(&client, key).await;

        let p1 = part(&client, &id, key, 1, b"keep-").await;
        let _p2 = part(&client, &id, key, 2, b"skip-").await;
        let p3 = part(&client, &id, key, 3, b"also").await;

        client
            .finish_multipart_upload(&id, key, vec![p1, p3])
            .await
            .unwrap_or_else(|e| panic!("finish: {e}"));
        assert_eq!(read_all(&client, key).await.as_ref(), b"keep-also");
    }

    #[tokio::test]
    async fn test_should_reject_forged_chunk_and_commit_nothing() {
        let client = client();
        let key = "forged.txt";
        put(&client, key, b"original").await;
        let id = open(&client, key).await;
        let p1 = part(&client, &id, key, 1, b"one").await;

        let forged = CompletedPart::new("not-a-real-chunk", 1);
        let missing = CompletedPart::new(p1.chunk_id.clone(), 7);
        for bad in [vec![forged], vec![p1.clone(), missing]] {
            let err = client.finish_multipart_upload(&id, key, bad).await.err();
            assert_eq!(
                err.map(|e| e.code()),
                Some(StorageErrorCode::InvalidMultipartChunk)
            );
        }
        assert_eq!(read_all(&client, key).await.as_ref(), b"original");

        client
            .finish_multipart_upload(&id, key, vec![p1])
            .await
            .unwrap_or_else(|e| panic!("finish after failures: {e}"));
        assert_eq!(read_all(&client, key).await.as_ref(), b"one");
    }

    #[tokio::test]
    async fn test_should_reject_non_positive_part_numbers() {
        let client = client();
        let key = "numbers.txt";
        let id = open(&client, key).await;

        for number in [0, -1] {
            let err = client.upload_part(&id, key, number, body(b"x")).await.err();
            assert_eq!(
                err.map(|e| e.code()),
                Some(StorageErrorCode::InvalidMultipartChunk)
            );
        }
    }

    #[tokio::test]
    async fn test_should_reject_part_for_other_key() {
        let client = client();
        let id = open(&client, "a.txt").await;

        let err = client.upload_part(&id, "b.txt", 1, body(b"x")).await.err();
        assert_eq!(
            err.map(|e| e.code()),
            Some(StorageErrorCode::InvalidMultipartId)
        );

        let err = client.abort_multipart_upload(&id, "b.txt").await.err();
        assert_eq!(
            err.map(|e| e.code()),
            Some(StorageErrorCode::InvalidMultipartId)
        );
        part(&client, &id, "/a.txt", 1, b"x").await;
    }

    #[tokio::test]
    async fn test_should_invalidate_id_after_abort() {
        let client = client();
        let key = "docs/aborted.txt";
        let id = open(&client, key).await;
        let p1 = part(&client, &id, key, 1, b"never").await;

        client
            .abort_multipart_upload(&id, key)
            .await
            .unwrap_or_else(|e| panic!("abort: {e}"));

        let err = client.upload_part(&id, key, 1, body(b"late")).await.err();
        assert_eq!(
            err.map(|e| e.code()),
            Some(StorageErrorCode::InvalidMultipartId)
        );
        let err = client
            .finish_multipart_upload(&id, key, vec![p1])
            .await
            .err();
        assert_eq!(
            err.map(|e| e.code()),
            Some(StorageErrorCode::InvalidMultipartId)
        );
        let err = client.abort_multipart_upload(&id, key).await.err();
        assert_eq!(
            err.map(|e| e.code()),
            Some(StorageErrorCode::InvalidMultipartId)
        );
        assert!(!client.exists(key).await.unwrap_or(true));
    }

    #[tokio::test]
    async fn test_should_invalidate_id_after_finish() {
        let client = client();
        let key = "once.txt";
        let id = open(&client, key).await;
        let p1 = part(&client, &id, key, 1, b"once").await;

        client
            .finish_multipart_upload(&id, key, vec![p1.clone()])
            .await
            .unwrap_or_else(|e| panic!("finish: {e}"));

        let err = client
            .finish_multipart_upload(&id, key, vec![p1])
            .await
            .err();
        assert_eq!(
            err.map(|e| e.code()),
            Some(StorageErrorCode::InvalidMultipartId)
        );
    }

    #[tokio::test]
    async fn test_should_issue_distinct_upload_ids() {
        let client = client();
        let a = open(&client, "same.txt").await;
        let b = open(&client, "same.txt").await;
        assert_ne!(a, b);

        let pa = part(&client, &a, "same.txt", 1, b"from-a").await;
        let pb = part(&client, &b, "same.txt", 1, b"from-b").await;

        client
            .finish_multipart_upload(&a, "same.txt", vec![pa])
            .await
            .unwrap_or_else(|e| panic!("finish a: {e}"));
        client
            .finish_multipart_upload(&b, "same.txt", vec![pb])
            .await
            .unwrap_or_else(|e| panic!("finish b: {e}"));
        assert_eq!(read_all(&client, "same.txt").await.as_ref(), b"from-b");
    }

    #[tokio::test]
    async fn test_should_commit_empty_object_for_empty_part_list() {
        let client = client();
        let key = "nothing.bin";
        let id = open(&client, key).await;
        let _p1 = part(&client, &id, key, 1, b"unused").await;

        client
            .finish_multipart_upload(&id, key, Vec::new())
            .await
            .unwrap_or_else(|e| panic!("finish: {e}"));
        assert!(client.exists(key).await.unwrap_or(false));
        assert_eq!(client.size(key).await.unwrap_or(1), 0);
    }
}
