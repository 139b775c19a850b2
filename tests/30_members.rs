mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn fresh_member_stats_are_zeroed_counts() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, member_id, _email) =
        common::register_and_login(server, &client, "Idle", "mechanical").await?;

    let res = client
        .get(format!(
            "{}/api/members/{}/stats",
            server.base_url, member_id
        ))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let stats = res.json::<serde_json::Value>().await?;
    assert_eq!(stats["completed_tasks"], 0);
    assert_eq!(stats["articles_written"], 0);
    assert_eq!(stats["robots_led"], 0);

    Ok(())
}

#[tokio::test]
async fn member_listing_requires_token_and_hides_password() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, member_id, _email) =
        common::register_and_login(server, &client, "Lister", "coding").await?;

    let res = client
        .get(format!("{}/api/members", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let members = res.json::<Vec<serde_json::Value>>().await?;
    let me = members
        .iter()
        .find(|m| m["member_id"] == member_id)
        .expect("registered member missing from listing");
    assert!(me.get("password").is_none(), "password leaked: {}", me);

    Ok(())
}

#[tokio::test]
async fn standard_member_cannot_mutate_members() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, member_id, _email) =
        common::register_and_login(server, &client, "Plain", "coding").await?;

    let res = client
        .put(format!("{}/api/members/{}", server.base_url, member_id))
        .bearer_auth(&token)
        .json(&json!({ "name": "Renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = client
        .delete(format!("{}/api/members/{}", server.base_url, member_id))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}

#[tokio::test]
async fn unknown_member_id_is_not_found() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let (token, _id, _email) =
        common::register_and_login(server, &client, "Seeker", "coding").await?;

    let res = client
        .get(format!("{}/api/members/999999999", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}
