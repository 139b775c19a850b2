mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn leading_a_robot_project_is_credited() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, member_id, _email) =
        common::register_and_login(server, &client, "Lead", "mechanical").await?;

    let res = client
        .post(format!("{}/api/robots", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "name": format!("Crescendo bot {}", common::unique_suffix()),
            "competition_year": 2024,
            "team_lead_id": member_id,
            "specifications": "swerve drive, under-bumper intake",
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let robot = res.json::<serde_json::Value>().await?;
    assert_eq!(robot["team_lead_name"], "Lead");

    let res = client
        .get(format!(
            "{}/api/members/{}/stats",
            server.base_url, member_id
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    let stats = res.json::<serde_json::Value>().await?;
    assert_eq!(stats["robots_led"], 1);

    Ok(())
}

#[tokio::test]
async fn partial_update_preserves_absent_fields() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _member_id, _email) =
        common::register_and_login(server, &client, "Tuner", "mechanical").await?;

    let res = client
        .post(format!("{}/api/robots", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "name": format!("Prototype {}", common::unique_suffix()),
            "competition_year": 2025,
            "specifications": "tank drive",
        }))
        .send()
        .await?;
    let robot = res.json::<serde_json::Value>().await?;
    let robot_id = robot["robot_id"].as_i64().expect("robot_id");
    assert!(robot["final_rank"].is_null());

    let res = client
        .put(format!("{}/api/robots/{}", server.base_url, robot_id))
        .bearer_auth(&token)
        .json(&json!({ "final_rank": 3, "performance_notes": "strong autonomous" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let updated = res.json::<serde_json::Value>().await?;
    assert_eq!(updated["final_rank"], 3);
    assert_eq!(updated["performance_notes"], "strong autonomous");
    assert_eq!(updated["specifications"], "tank drive");
    assert_eq!(updated["competition_year"], 2025);

    Ok(())
}

#[tokio::test]
async fn listing_filters_by_year_and_search() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _member_id, _email) =
        common::register_and_login(server, &client, "Archivist", "coding").await?;

    let marker = format!("archive{}", common::unique_suffix());
    for (year, name) in [(2023, "older"), (2024, "newer")] {
        let res = client
            .post(format!("{}/api/robots", server.base_url))
            .bearer_auth(&token)
            .json(&json!({
                "name": format!("{} {} {}", name, marker, year),
                "competition_year": year,
            }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client
        .get(format!(
            "{}/api/robots?search={}&year=2024",
            server.base_url, marker
        ))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let robots = res.json::<Vec<serde_json::Value>>().await?;
    assert_eq!(robots.len(), 1, "expected the 2024 robot only: {:?}", robots);
    assert_eq!(robots[0]["competition_year"], 2024);

    Ok(())
}

#[tokio::test]
async fn mutation_requires_a_token_but_reads_do_not() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/robots", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .post(format!("{}/api/robots", server.base_url))
        .json(&json!({ "name": "Unauthenticated bot" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_robot_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _member_id, _email) =
        common::register_and_login(server, &client, "Scrapper", "mechanical").await?;

    let res = client
        .delete(format!("{}/api/robots/999999999", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
