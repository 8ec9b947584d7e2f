use graphql_query_mock::{Mock, QueryMock};
use http::HeaderMap;
use serde_json::json;
use std::time::Duration;

const TEST_QUERY: &str = "query TestQuery { id }";

#[tokio::test]
async fn responses_are_held_back_until_released() {
    // Arrange
    let query_mock = QueryMock::new();
    let handle = Mock::given("TestQuery")
        .respond_with(json!({ "id": "1" }))
        .mount_with_controlled_resolution(&query_mock)
        .await;

    let request = query_mock.dispatch(TEST_QUERY, None, HeaderMap::new());
    tokio::pin!(request);

    // Act
    let pending = tokio::time::timeout(Duration::from_millis(100), &mut request).await;

    // Assert
    assert!(pending.is_err());
    assert!(!handle.is_released());
    // The call is recorded while the response is held back
    assert_eq!(query_mock.calls().await.len(), 1);

    // Act
    handle.release();
    let response = tokio::time::timeout(Duration::from_secs(5), &mut request)
        .await
        .expect("The response was not released")
        .unwrap();

    // Assert
    assert!(handle.is_released());
    assert_eq!(response.body.data, json!({ "id": "1" }));
}

#[tokio::test]
async fn releasing_before_the_request_lets_it_through_immediately() {
    // Arrange
    let query_mock = QueryMock::new();
    let handle = Mock::given("TestQuery")
        .respond_with(json!({ "id": "1" }))
        .mount_with_controlled_resolution(&query_mock)
        .await;
    handle.release();

    // Act
    let response = tokio::time::timeout(
        Duration::from_secs(5),
        query_mock.dispatch(TEST_QUERY, None, HeaderMap::new()),
    )
    .await
    .expect("The response was not released")
    .unwrap();

    // Assert
    assert_eq!(response.body.data, json!({ "id": "1" }));
}

#[tokio::test]
async fn releasing_twice_has_no_further_effect() {
    // Arrange
    let query_mock = QueryMock::new();
    let handle = Mock::given("TestQuery")
        .respond_with(json!({ "id": "1" }))
        .mount_with_controlled_resolution(&query_mock)
        .await;

    // Act
    handle.release();
    handle.release();
    let first = query_mock
        .dispatch(TEST_QUERY, None, HeaderMap::new())
        .await
        .unwrap();
    let second = query_mock
        .dispatch(TEST_QUERY, None, HeaderMap::new())
        .await
        .unwrap();

    // Assert
    assert!(handle.is_released());
    assert_eq!(first, second);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn all_the_requests_waiting_on_a_mock_are_released_together() {
    // Arrange
    let query_mock = QueryMock::new();
    let handle = Mock::given("TestQuery")
        .respond_with(json!({ "id": "1" }))
        .mount_with_controlled_resolution(&query_mock)
        .await;

    let requests: Vec<_> = (0..3)
        .map(|_| {
            let query_mock = query_mock.clone();
            tokio::spawn(async move {
                query_mock
                    .dispatch(TEST_QUERY, None, HeaderMap::new())
                    .await
            })
        })
        .collect();
    while query_mock.calls().await.len() < 3 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    // Act
    handle.release();
    let responses = tokio::time::timeout(
        Duration::from_secs(5),
        futures::future::join_all(requests),
    )
    .await
    .expect("The responses were not released");

    // Assert
    for response in responses {
        assert_eq!(response.unwrap().unwrap().body.data, json!({ "id": "1" }));
    }
}

#[tokio::test]
async fn other_mocks_are_not_held_back() {
    // Arrange
    let query_mock = QueryMock::new();
    let _handle = Mock::given("Held")
        .respond_with(json!({}))
        .mount_with_controlled_resolution(&query_mock)
        .await;
    Mock::given("TestQuery")
        .respond_with(json!({ "id": "1" }))
        .mount(&query_mock)
        .await;

    // Act
    let response = tokio::time::timeout(
        Duration::from_secs(5),
        query_mock.dispatch(TEST_QUERY, None, HeaderMap::new()),
    )
    .await
    .expect("The response was held back")
    .unwrap();

    // Assert
    assert_eq!(response.body.data, json!({ "id": "1" }));
}
