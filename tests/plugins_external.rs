use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use reqwest::Client;
use serde_json::json;

use lexi_brain::config::ServiceConfig;
use lexi_brain::domains::response::{PluginData, ResultType, WeatherData};
use lexi_brain::interfaces::plugins::{Plugin, PluginRequest};
use lexi_brain::plugins::news::NewsPlugin;
use lexi_brain::plugins::search::SearchPlugin;
use lexi_brain::plugins::weather::WeatherPlugin;
use lexi_brain::plugins::youtube::YoutubePlugin;
use lexi_brain::PluginResult;

fn service(server: &MockServer) -> ServiceConfig {
    ServiceConfig::with_key_and_base("test-key", &server.base_url())
}

fn assert_data_iff_success(result: &PluginResult) {
    assert_eq!(result.data().is_some(), result.is_success());
}

#[tokio::test]
async fn weather_geocodes_then_fetches_conditions() {
    let server = MockServer::start_async().await;
    let geo = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/geo/1.0/direct")
                .query_param("q", "Paris")
                .query_param("limit", "1")
                .query_param("appid", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{"lat": 48.85, "lon": 2.35, "name": "Paris", "country": "FR"}]));
        })
        .await;
    let conditions = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/data/2.5/weather")
                .query_param("lat", "48.85")
                .query_param("lon", "2.35")
                .query_param("units", "metric");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "main": {"temp": 18.4, "humidity": 60},
                    "weather": [{"description": "clear sky", "icon": "01d"}],
                    "wind": {"speed": 3.1}
                }));
        })
        .await;

    let plugin = WeatherPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin
        .execute(PluginRequest::Weather {
            location: "Paris".to_string(),
        })
        .await
        .expect("weather execute");

    assert!(result.is_success());
    assert_eq!(result.result_type(), ResultType::Weather);
    assert_eq!(
        result.data(),
        Some(&PluginData::Weather(WeatherData {
            location: "Paris, FR".to_string(),
            temperature: 18,
            description: "clear sky".to_string(),
            humidity: 60,
            wind_speed: 3.1,
            icon: "01d".to_string(),
        }))
    );
    assert_eq!(
        result.summary(),
        "It's 18°C and clear sky in Paris, FR. Humidity is 60% and wind speed is 3.1 m/s."
    );
    geo.assert_calls(1);
    conditions.assert_calls(1);
}

#[tokio::test]
async fn sub_zero_half_degrees_round_up() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geo/1.0/direct").query_param("q", "Oslo");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{"lat": 59.91, "lon": 10.75, "name": "Oslo", "country": "NO"}]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2.5/weather");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "main": {"temp": -2.5, "humidity": 90},
                    "weather": [{"description": "snow", "icon": "13d"}],
                    "wind": {"speed": 4.0}
                }));
        })
        .await;

    let plugin = WeatherPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("Oslo").await;

    assert!(result.is_success());
    assert_eq!(
        result.summary(),
        "It's -2°C and snow in Oslo, NO. Humidity is 90% and wind speed is 4 m/s."
    );
    match result.data() {
        Some(PluginData::Weather(data)) => assert_eq!(data.temperature, -2),
        other => panic!("unexpected data: {other:?}"),
    }
}

#[tokio::test]
async fn weather_empty_geocode_names_the_location() {
    let server = MockServer::start_async().await;
    let geo = server
        .mock_async(|when, then| {
            when.method(GET).path("/geo/1.0/direct");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([]));
        })
        .await;
    let conditions = server
        .mock_async(|when, then| {
            when.method(GET).path("/data/2.5/weather");
            then.status(200).json_body(json!({}));
        })
        .await;

    let plugin = WeatherPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("Atlantis").await;

    assert!(!result.is_success());
    assert_data_iff_success(&result);
    assert!(result.summary().contains("Atlantis"));
    geo.assert_calls(1);
    conditions.assert_calls(0);
}

#[tokio::test]
async fn weather_upstream_error_is_a_retry_later_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/geo/1.0/direct");
            then.status(401).json_body(json!({"cod": 401, "message": "Invalid API key"}));
        })
        .await;

    let plugin = WeatherPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("Paris").await;

    assert!(!result.is_success());
    assert_eq!(result.result_type(), ResultType::Weather);
    assert_eq!(
        result.summary(),
        "I couldn't fetch the weather right now. Please try again later."
    );
    assert!(!result.summary().contains("Invalid API key"));
}

#[tokio::test]
async fn missing_credentials_short_circuit_without_network() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200).json_body(json!({}));
        })
        .await;
    let keyless = ServiceConfig {
        api_key: None,
        base_url: Some(server.base_url()),
    };
    let client = Client::new();

    let weather = WeatherPlugin::new(client.clone(), Some(&keyless));
    let news = NewsPlugin::new(client.clone(), Some(&keyless));
    let search = SearchPlugin::new(client.clone(), Some(&keyless));
    let youtube = YoutubePlugin::new(client, Some(&keyless));

    let results = vec![
        weather.lookup("Paris").await,
        news.lookup("general").await,
        search.lookup("rust").await,
        youtube.lookup("rust").await,
    ];
    let settings = [
        "LEXI_WEATHER_API_KEY",
        "LEXI_NEWS_API_KEY",
        "LEXI_SERPER_API_KEY",
        "LEXI_YOUTUBE_API_KEY",
    ];
    for (result, setting) in results.iter().zip(settings) {
        assert!(!result.is_success());
        assert_data_iff_success(result);
        assert!(result.summary().contains("not configured"));
        assert!(result.summary().contains(setting));
    }
    assert!(!weather.is_configured());
    any.assert_calls(0);
}

#[tokio::test]
async fn news_topic_search_normalizes_articles() {
    let server = MockServer::start_async().await;
    let everything = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/everything")
                .query_param("q", "rust")
                .query_param("sortBy", "publishedAt")
                .query_param("apiKey", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "status": "ok",
                    "totalResults": 57,
                    "articles": [
                        {"source": {"id": null, "name": "Wire"}, "title": "Rust 2.0", "url": "https://a", "publishedAt": "2026-01-01T00:00:00Z"},
                        {"source": {"id": null}, "title": "Crates", "description": "d"},
                        {"source": "Blog", "title": "Borrowck", "urlToImage": "https://img"},
                        {"title": null}
                    ]
                }));
        })
        .await;

    let plugin = NewsPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin
        .execute(PluginRequest::News {
            topic: "rust".to_string(),
        })
        .await
        .expect("news execute");

    assert!(result.is_success());
    assert_eq!(
        result.summary(),
        "Here are the top 4 news about rust articles: Rust 2.0, Crates, Borrowck"
    );
    let Some(PluginData::News(data)) = result.data() else {
        panic!("expected news data");
    };
    assert_eq!(data.total_results, 57);
    assert_eq!(data.articles[1].source, "Unknown");
    assert_eq!(data.articles[2].url_to_image.as_deref(), Some("https://img"));
    assert_eq!(data.articles[3].title, "No title");
    everything.assert_calls(1);
}

#[tokio::test]
async fn general_news_falls_back_to_top_headlines() {
    let server = MockServer::start_async().await;
    let everything = server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(426).json_body(json!({"status": "error", "code": "upgradeRequired"}));
        })
        .await;
    let headlines = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v2/top-headlines")
                .query_param("country", "us");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "totalResults": 1,
                    "articles": [{"source": {"name": "AP"}, "title": "Headline"}]
                }));
        })
        .await;

    let plugin = NewsPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("general").await;

    assert!(result.is_success());
    assert_eq!(
        result.summary(),
        "Here are the top 1 latest news articles: Headline"
    );
    everything.assert_calls(1);
    headlines.assert_calls(1);
}

#[tokio::test]
async fn topic_news_does_not_fall_back() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(500);
        })
        .await;
    let headlines = server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/top-headlines");
            then.status(200).json_body(json!({"articles": []}));
        })
        .await;

    let plugin = NewsPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("rust").await;

    assert!(!result.is_success());
    assert_eq!(
        result.summary(),
        "I couldn't fetch the news right now. Please try again later."
    );
    headlines.assert_calls(0);
}

#[tokio::test]
async fn news_with_no_articles_is_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v2/everything");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"totalResults": 0, "articles": []}));
        })
        .await;

    let plugin = NewsPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("zig").await;

    assert!(!result.is_success());
    assert_eq!(
        result.summary(),
        "I couldn't find any news articles about zig. Please try a different topic."
    );
}

#[tokio::test]
async fn search_posts_query_and_summarizes_top_titles() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/search")
                .header("x-api-key", "test-key")
                .header("content-type", "application/json");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "organic": [
                        {"title": "Rust", "link": "https://rust-lang.org", "snippet": "A language", "position": 1},
                        {"title": "Go", "link": "https://go.dev", "position": 2},
                        {"title": "Comparison", "snippet": "vs"},
                        {"title": "Fourth"}
                    ],
                    "searchInformation": {"totalResults": "1200"}
                }));
        })
        .await;

    let plugin = SearchPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("rust vs go").await;

    assert!(result.is_success());
    assert_eq!(
        result.summary(),
        "I found 4 results for \"rust vs go\". Here are the top results: Rust, Go, Comparison"
    );
    let Some(PluginData::Search(data)) = result.data() else {
        panic!("expected search data");
    };
    assert_eq!(data.total_results, 1200);
    assert_eq!(data.query, "rust vs go");
    assert_eq!(data.results[1].snippet, "No description available");
    assert_eq!(data.results[2].link, "#");
    assert_eq!(data.results[2].position, 3);
    search.assert_calls(1);
}

#[tokio::test]
async fn empty_search_query_asks_for_more_detail() {
    let server = MockServer::start_async().await;
    let any = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(200).json_body(json!({}));
        })
        .await;

    let plugin = SearchPlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin
        .execute(PluginRequest::Search {
            query: "   ".to_string(),
        })
        .await
        .expect("search execute");

    assert!(!result.is_success());
    assert_eq!(
        result.summary(),
        "Please specify what you'd like me to search for."
    );
    any.assert_calls(0);
}

#[tokio::test]
async fn youtube_joins_details_by_video_id() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/youtube/v3/search")
                .query_param("q", "lofi")
                .query_param("type", "video")
                .query_param("key", "test-key");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "pageInfo": {"totalResults": 1000000},
                    "items": [
                        {
                            "id": {"videoId": "aaa"},
                            "snippet": {
                                "title": "Lofi Girl",
                                "channelTitle": "Lofi Records",
                                "publishedAt": "2020-02-22T00:00:00Z",
                                "thumbnails": {"default": {"url": "https://img/default"}, "medium": {"url": "https://img/medium"}}
                            }
                        },
                        {
                            "id": {"videoId": "bbb"},
                            "snippet": {"title": "Beats", "thumbnails": {"default": {"url": "https://img/b"}}}
                        }
                    ]
                }));
        })
        .await;
    let details = server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/videos");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "items": [
                        {"id": "bbb", "contentDetails": {"duration": "PT3M5S"}, "statistics": {"viewCount": "999"}},
                        {"id": "aaa", "contentDetails": {"duration": "PT1H2M3S"}, "statistics": {"viewCount": "2500000"}}
                    ]
                }));
        })
        .await;

    let plugin = YoutubePlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("lofi").await;

    assert!(result.is_success());
    assert_eq!(
        result.summary(),
        "I found 2 YouTube videos for \"lofi\". Here's the top result: \"Lofi Girl\" by Lofi Records"
    );
    let Some(PluginData::Youtube(data)) = result.data() else {
        panic!("expected youtube data");
    };
    assert_eq!(data.total_results, 1_000_000);
    assert_eq!(data.videos[0].duration, "1:02:03");
    assert_eq!(data.videos[0].view_count, "2.5M views");
    assert_eq!(data.videos[0].thumbnail, "https://img/medium");
    assert_eq!(data.videos[1].duration, "3:05");
    assert_eq!(data.videos[1].view_count, "999 views");
    assert_eq!(data.videos[1].channel_title, "Unknown channel");
    assert_eq!(data.videos[1].description, "No description available");
    search.assert_calls(1);
    details.assert_calls(1);
}

#[tokio::test]
async fn youtube_details_failure_degrades_to_placeholders() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/search");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "items": [{"id": {"videoId": "aaa"}, "snippet": {"title": "Clip", "channelTitle": "Chan"}}]
                }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/videos");
            then.status(403);
        })
        .await;

    let plugin = YoutubePlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("clip").await;

    assert!(result.is_success());
    let Some(PluginData::Youtube(data)) = result.data() else {
        panic!("expected youtube data");
    };
    assert_eq!(data.videos[0].duration, "Unknown");
    assert_eq!(data.videos[0].view_count, "Unknown views");
    assert_eq!(data.total_results, 0);
}

#[tokio::test]
async fn youtube_search_failure_is_a_retry_later_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/youtube/v3/search");
            then.status(500);
        })
        .await;

    let plugin = YoutubePlugin::new(Client::new(), Some(&service(&server)));
    let result = plugin.lookup("clip").await;

    assert!(!result.is_success());
    assert_data_iff_success(&result);
    assert_eq!(
        result.summary(),
        "I couldn't search YouTube right now. Please try again later."
    );
}

#[tokio::test]
async fn mismatched_request_is_an_error_not_a_result() {
    let plugin = WeatherPlugin::new(Client::new(), Some(&ServiceConfig::with_key("k")));
    let err = plugin
        .execute(PluginRequest::News {
            topic: "general".to_string(),
        })
        .await
        .expect_err("weather plugin should refuse news requests");
    assert!(format!("{err}").contains("weather plugin"));
}
