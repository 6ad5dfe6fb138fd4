use crate::common::{TestApp, routes, stats};
use leetcode::{ProviderError, StatsSnapshot};

mod rating_update {
    use super::*;

    #[tokio::test]
    async fn records_composite_rating() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        app.provider.set("ada", Ok(stats(10, 5, 2, 1500.0)));

        let res = app.post_empty(&routes::rating(id)).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["rating"], 335);
        assert_eq!(res.body["easy_count"], 10);
        assert_eq!(res.body["medium_count"], 5);
        assert_eq!(res.body["hard_count"], 2);
        assert_eq!(res.body["problems_count"], 17);
        assert_eq!(res.body["global_rank"], 5000);
    }

    #[tokio::test]
    async fn ratings_are_appended_newest_first() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;

        app.provider.set("ada", Ok(stats(1, 0, 0, 0.0)));
        app.post_empty(&routes::rating(id)).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        app.provider.set("ada", Ok(stats(2, 0, 0, 0.0)));
        app.post_empty(&routes::rating(id)).await;

        let res = app.get(&routes::ratings(id)).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["rating"], 2);
        assert_eq!(data[1]["rating"], 1);
    }

    #[tokio::test]
    async fn unknown_student_is_404() {
        let app = TestApp::spawn().await;

        let res = app.post_empty(&routes::rating(77)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
        assert_eq!(app.provider.calls(), 0);
    }

    #[tokio::test]
    async fn student_without_username_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", None).await;

        let res = app.post_empty(&routes::rating(id)).await;

        assert_eq!(res.status, 422);
        assert_eq!(res.body["code"], "NO_EXTERNAL_USERNAME");
        assert_eq!(app.provider.calls(), 0);
    }

    #[tokio::test]
    async fn unknown_leetcode_user_is_not_retried() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ghost")).await;

        let res = app.post_empty(&routes::rating(id)).await;

        assert_eq!(res.status, 422);
        assert_eq!(res.body["code"], "PROVIDER_USER_NOT_FOUND");
        assert_eq!(
            res.body["hint"],
            "invalid username, rate limiting, or provider outage"
        );
        assert_eq!(app.provider.calls(), 1);
    }

    #[tokio::test]
    async fn all_zero_stats_fail_after_retries() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        app.provider.set("ada", Ok(StatsSnapshot::default()));

        let res = app.post_empty(&routes::rating(id)).await;

        assert_eq!(res.status, 502);
        assert_eq!(res.body["code"], "ZERO_VALUE_DATA");
        assert_eq!(app.provider.calls(), 3);

        let ratings = app.get(&routes::ratings(id)).await;
        assert!(ratings.body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rate_limit_surfaces_retry_after() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        app.provider.set(
            "ada",
            Err(ProviderError::RateLimited {
                retry_after_secs: Some(60),
            }),
        );

        let res = app.post_empty(&routes::rating(id)).await;

        assert_eq!(res.status, 503);
        assert_eq!(res.body["code"], "PROVIDER_UNAVAILABLE");
        assert_eq!(res.retry_after.as_deref(), Some("60"));
        assert_eq!(app.provider.calls(), 3);
    }
}
