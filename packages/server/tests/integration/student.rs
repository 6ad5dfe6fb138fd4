use crate::common::{TestApp, contest, routes, stats};
use serde_json::json;

fn valid_student_body(student_id: &str) -> serde_json::Value {
    json!({
        "student_id": student_id,
        "name": "Ada Lovelace",
        "email": format!("{student_id}@example.edu"),
        "leetcode_id": format!("lc_{student_id}"),
        "passing_year": 2025,
        "batch": "2021-2025",
        "department": "Computer Science",
    })
}

mod student_creation {
    use super::*;

    #[tokio::test]
    async fn creates_a_student() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::STUDENTS, &valid_student_body("S1")).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["student_id"], "S1");
        assert_eq!(res.body["leetcode_id"], "lc_S1");
        assert!(res.body["id"].as_i64().is_some());
    }

    #[tokio::test]
    async fn leetcode_id_is_optional() {
        let app = TestApp::spawn().await;

        let mut body = valid_student_body("S1");
        body.as_object_mut().unwrap().remove("leetcode_id");
        let res = app.post(routes::STUDENTS, &body).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["leetcode_id"].is_null());
    }

    #[tokio::test]
    async fn rejects_blank_name() {
        let app = TestApp::spawn().await;

        let mut body = valid_student_body("S1");
        body["name"] = json!("   ");
        let res = app.post(routes::STUDENTS, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_email_without_at_sign() {
        let app = TestApp::spawn().await;

        let mut body = valid_student_body("S1");
        body["email"] = json!("not-an-email");
        let res = app.post(routes::STUDENTS, &body).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn rejects_malformed_json() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::STUDENTS, &json!({"name": 42})).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let app = TestApp::spawn().await;
        app.post(routes::STUDENTS, &valid_student_body("S1")).await;

        let mut body = valid_student_body("S2");
        body["email"] = json!("S1@example.edu");
        let res = app.post(routes::STUDENTS, &body).await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn duplicate_leetcode_id_conflicts() {
        let app = TestApp::spawn().await;
        app.post(routes::STUDENTS, &valid_student_body("S1")).await;

        let mut body = valid_student_body("S2");
        body["leetcode_id"] = json!("lc_S1");
        let res = app.post(routes::STUDENTS, &body).await;

        assert_eq!(res.status, 409);
    }
}

mod student_listing {
    use super::*;

    #[tokio::test]
    async fn lists_in_id_order_with_pagination() {
        let app = TestApp::spawn().await;
        for i in 1..=5 {
            app.create_student(&format!("S{i}"), None).await;
        }

        let res = app
            .get(&format!("{}?page=2&per_page=2", routes::STUDENTS))
            .await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["student_id"], "S3");
        assert_eq!(data[1]["student_id"], "S4");
        assert_eq!(res.body["pagination"]["total"], 5);
        assert_eq!(res.body["pagination"]["total_pages"], 3);
    }

    #[tokio::test]
    async fn get_unknown_student_is_404() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::student(999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod student_deletion {
    use super::*;

    #[tokio::test]
    async fn delete_cascades_to_history() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;
        app.provider.set("ada", Ok(stats(10, 5, 2, 1500.0)));

        assert_eq!(app.post_empty(&routes::rating(id)).await.status, 201);
        assert_eq!(app.post_empty(&routes::contest_history(id)).await.status, 200);

        let res = app.delete(&routes::student(id)).await;
        assert_eq!(res.status, 204);

        assert_eq!(app.get(&routes::student(id)).await.status, 404);
        assert_eq!(app.get(&routes::ratings(id)).await.status, 404);
    }

    #[tokio::test]
    async fn delete_waits_for_in_flight_sync() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;

        // Stand in for a sync holding the student's lock.
        let guard = app.state.locks.lock(id).await;
        let client = app.client.clone();
        let url = format!("http://{}{}", app.addr, routes::student(id));
        let pending = tokio::spawn(async move {
            client.delete(url).send().await.unwrap().status().as_u16()
        });

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert!(!pending.is_finished());
        assert_eq!(app.get(&routes::student(id)).await.status, 200);

        drop(guard);
        assert_eq!(pending.await.unwrap(), 204);
        assert_eq!(app.get(&routes::student(id)).await.status, 404);
    }

    #[tokio::test]
    async fn delete_unknown_student_is_404() {
        let app = TestApp::spawn().await;

        let res = app.delete(&routes::student(42)).await;

        assert_eq!(res.status, 404);
    }
}

mod student_stats {
    use super::*;

    #[tokio::test]
    async fn aggregates_ratings_and_contests() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", Some("ada")).await;

        let mut snapshot = stats(10, 5, 2, 1500.0);
        snapshot.contest_history = vec![
            contest("Weekly Contest 399", 1400.0, 1_717_295_400),
            contest("Weekly Contest 400", 1600.0, 1_717_900_200),
        ];
        app.provider.set("ada", Ok(snapshot));
        app.post_empty(&routes::rating(id)).await;
        app.post_empty(&routes::contest_history(id)).await;

        let res = app.get(&routes::student_stats(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["current_rating"], 335);
        assert_eq!(res.body["highest_rating"], 335);
        assert_eq!(res.body["contests_participated"], 2);
        assert_eq!(res.body["average_contest_rating"], 1500.0);
        assert_eq!(res.body["latest_contest_rating"], 1600.0);
    }

    #[tokio::test]
    async fn student_without_data_has_empty_stats() {
        let app = TestApp::spawn().await;
        let id = app.create_student("S1", None).await;

        let res = app.get(&routes::student_stats(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["contests_participated"], 0);
        assert!(res.body["current_rating"].is_null());
    }
}

mod student_leaderboard {
    use super::*;

    async fn enroll(app: &TestApp, student_id: &str, department: &str, batch: &str) -> i32 {
        let mut body = valid_student_body(student_id);
        body["department"] = json!(department);
        body["batch"] = json!(batch);
        let res = app.post(routes::STUDENTS, &body).await;
        assert_eq!(res.status, 201, "{}", res.text);
        res.id()
    }

    fn names(res: &crate::common::TestResponse) -> Vec<String> {
        res.body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["student_id"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn ranks_by_latest_rating_with_filters() {
        let app = TestApp::spawn().await;
        let alice = enroll(&app, "S1", "Computer Science", "2022-2026").await;
        let bob = enroll(&app, "S2", "Computer Science", "2022-2026").await;
        let carol = enroll(&app, "S3", "Electrical", "2021-2025").await;
        enroll(&app, "S4", "Computer Science", "2022-2026").await;

        app.provider.set("lc_S1", Ok(stats(10, 5, 2, 1500.0)));
        app.provider.set("lc_S3", Ok(stats(30, 0, 0, 0.0)));
        app.provider.set("lc_S2", Ok(stats(20, 20, 20, 2000.0)));
        assert_eq!(app.post_empty(&routes::rating(bob)).await.status, 201);
        // Bob's current rating is the newer, lower one.
        app.provider.set("lc_S2", Ok(stats(1, 1, 1, 0.0)));
        for id in [alice, bob, carol] {
            assert_eq!(app.post_empty(&routes::rating(id)).await.status, 201);
        }

        let res = app.get(routes::LEADERBOARD).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(names(&res), ["S1", "S3", "S2"]);
        assert_eq!(res.body["data"][0]["rank"], 1);
        assert_eq!(res.body["data"][0]["rating"], 335);
        assert_eq!(res.body["data"][2]["rank"], 3);
        assert_eq!(res.body["data"][2]["rating"], 9);

        let res = app
            .get(&format!("{}?department=Computer%20Science", routes::LEADERBOARD))
            .await;
        assert_eq!(names(&res), ["S1", "S2"]);

        let res = app
            .get(&format!("{}?batch=2021-2025", routes::LEADERBOARD))
            .await;
        assert_eq!(names(&res), ["S3"]);
    }

    #[tokio::test]
    async fn empty_when_nobody_is_rated() {
        let app = TestApp::spawn().await;
        enroll(&app, "S1", "Computer Science", "2022-2026").await;

        let res = app.get(routes::LEADERBOARD).await;

        assert_eq!(res.status, 200);
        assert!(res.body["data"].as_array().unwrap().is_empty());
    }
}
