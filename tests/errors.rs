use graphql_query_mock::{DispatchError, Mock, QueryMock, StatusFailure, VariablesMismatch};
use http::HeaderMap;
use serde_json::json;

#[async_std::test]
async fn a_request_without_an_operation_name_cannot_be_answered() {
    // Arrange
    let query_mock = QueryMock::new();

    // Act
    let error = query_mock
        .dispatch("{ viewer { id } }", None, HeaderMap::new())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(error, DispatchError::OperationNameMissing);
    assert_eq!(
        error.to_string(),
        "Could not find operation name in request. Please make sure you're actually sending the query in your fetch."
    );
    assert_eq!(error.status_code(), 500);
}

#[async_std::test]
async fn the_error_says_when_nothing_was_mocked() {
    // Arrange
    let query_mock = QueryMock::new();

    // Act
    let error = query_mock
        .dispatch(
            "query Missing($id: ID) { node(id: $id) { id } }",
            Some(json!({ "id": "1" })),
            HeaderMap::new(),
        )
        .await
        .unwrap_err();

    // Assert
    let message = error.to_string();
    assert!(message.starts_with(
        "Could not find matching mock for operation \"Missing\" with variables: {\"id\":\"1\"}\n"
    ));
    assert!(message.contains("Make sure you have mocked the query you are making."));
    assert!(message.contains("=== No query was mocked ==="));
    assert!(!message.contains("=== All mocked queries ==="));
}

#[async_std::test]
async fn the_error_lists_the_operations_that_were_mocked() {
    // Arrange
    let query_mock = QueryMock::new();
    Mock::given("Second")
        .with_variables(json!({ "id": "2" }))
        .respond_with(json!({}))
        .mount(&query_mock)
        .await;
    Mock::given("First")
        .respond_with(json!({}))
        .mount(&query_mock)
        .await;

    // Act
    let error = query_mock
        .dispatch("query Missing { id }", None, HeaderMap::new())
        .await
        .unwrap_err();

    // Assert
    let message = error.to_string();
    assert!(message.contains("=== All mocked queries ===\n"));
    assert!(!message.contains("=== No query was mocked ==="));
    // Operations are listed alphabetically
    let first = message.find("- \"First\"").unwrap();
    let second = message.find("- \"Second\"").unwrap();
    assert!(first < second);
    assert!(message.contains("  Query \"variables\": {\"id\":\"2\"}\n"));
    assert!(message.contains("  Diff of \"variables\":\n"));
    assert!(matches!(
        error,
        DispatchError::NoMockRegistered { operation_name, .. } if operation_name == "Missing"
    ));
}

#[async_std::test]
async fn a_variables_mismatch_shows_a_diff() {
    // Arrange
    let query_mock = QueryMock::new();
    Mock::given("TestQuery")
        .with_variables(json!({ "id": "1", "ignored": true }))
        .ignore_variables(["ignored"])
        .respond_with(json!({}))
        .mount(&query_mock)
        .await;

    // Act
    let error = query_mock
        .dispatch(
            "query TestQuery($id: ID) { node(id: $id) { id } }",
            Some(json!({ "id": "2", "ignored": false })),
            HeaderMap::new(),
        )
        .await
        .unwrap_err();

    // Assert
    let message = error.to_string();
    assert!(message.starts_with(
        "Variables do not match for operation \"TestQuery\".\n\nVariables in request VS mocked variables: \n"
    ));
    assert!(message.contains("id"));
    match error {
        DispatchError::VariablesMismatch(VariablesMismatch::StructuralMismatch {
            operation_name,
            diff,
        }) => {
            assert_eq!(operation_name, "TestQuery");
            // Ignored properties are left out of the diff
            assert!(!diff.contains("ignored"));
        }
        other => panic!("Unexpected error: {:?}", other),
    }
}

#[async_std::test]
async fn an_exhausted_operation_is_reported_as_not_mocked() {
    // Arrange
    let query_mock = QueryMock::new();
    Mock::given("TestQuery")
        .respond_with(json!({}))
        .persist(false)
        .mount(&query_mock)
        .await;
    query_mock
        .dispatch("query TestQuery { id }", None, HeaderMap::new())
        .await
        .unwrap();

    // Act
    let error = query_mock
        .dispatch("query TestQuery { id }", None, HeaderMap::new())
        .await
        .unwrap_err();

    // Assert
    assert!(matches!(error, DispatchError::NoMockRegistered { .. }));
    assert!(error.to_string().contains("=== No query was mocked ==="));
}

#[async_std::test]
async fn a_configured_status_failure_mentions_the_operation_and_the_status() {
    // Arrange
    let query_mock = QueryMock::new();
    Mock::given("TestQuery")
        .respond_with(json!({}))
        .with_status(502)
        .mount(&query_mock)
        .await;

    // Act
    let error = query_mock
        .dispatch("query TestQuery { id }", None, HeaderMap::new())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(
        error,
        DispatchError::ConfiguredStatusFailure(StatusFailure::GeneratedMessage {
            operation_name: "TestQuery".into(),
            status: 502,
        })
    );
    assert_eq!(
        error.to_string(),
        "Request for operation \"TestQuery\" failed with status 502. This is intentional and set up in the mock."
    );
}

#[async_std::test]
async fn a_custom_error_is_displayed_as_json() {
    // Arrange
    let query_mock = QueryMock::new();
    Mock::given("TestQuery")
        .respond_with(json!({}))
        .with_status(400)
        .with_error(json!({ "message": "Bad request" }))
        .mount(&query_mock)
        .await;

    // Act
    let error = query_mock
        .dispatch("query TestQuery { id }", None, HeaderMap::new())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(error.to_string(), r#"{"message":"Bad request"}"#);
    assert_eq!(error.status_code(), 400);
}

#[async_std::test]
async fn a_malformed_document_cannot_be_answered() {
    // Arrange
    let query_mock = QueryMock::new();
    Mock::given("Foo")
        .respond_with(json!({}))
        .mount(&query_mock)
        .await;

    // Act
    let error = query_mock
        .dispatch("query Foo {", None, HeaderMap::new())
        .await
        .unwrap_err();

    // Assert
    assert_eq!(error, DispatchError::OperationNameMissing);
    assert!(query_mock.calls().await.is_empty());
}
