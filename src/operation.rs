//! Extract the name of the operation a GraphQL document is executing.
use async_graphql_parser::parse_query;
use async_graphql_parser::types::DocumentOperations;

/// Return the name of the first operation defined in `query`, if it has one.
///
/// ```rust
/// use graphql_query_mock::operation::operation_name;
///
/// assert_eq!(operation_name("query TestQuery { id }").as_deref(), Some("TestQuery"));
/// assert_eq!(operation_name("mutation Save($id: ID!) { save(id: $id) }").as_deref(), Some("Save"));
/// // Anonymous operations don't have a name.
/// assert_eq!(operation_name("query { id }"), None);
/// assert_eq!(operation_name("{ id }"), None);
/// // Neither do documents that cannot be parsed.
/// assert_eq!(operation_name("query TestQuery {"), None);
/// ```
///
/// Fragment definitions are skipped: the name of the first *operation* is returned,
/// wherever it appears in the document.
pub fn operation_name(query: &str) -> Option<String> {
    select_operation(query, None)
}

/// Return the name of the operation of `query` that should be executed.
///
/// `requested` is the `operationName` sent alongside the document: when it is set,
/// it must name one of the operations defined in `query`. When it is not, the first
/// operation of the document is picked.
///
/// ```rust
/// use graphql_query_mock::operation::select_operation;
///
/// let query = "query First { a } query Second { b }";
/// assert_eq!(select_operation(query, None).as_deref(), Some("First"));
/// assert_eq!(select_operation(query, Some("Second")).as_deref(), Some("Second"));
/// assert_eq!(select_operation(query, Some("Third")), None);
/// ```
pub fn select_operation(query: &str, requested: Option<&str>) -> Option<String> {
    let document = parse_query(query).ok()?;
    let operations = match document.operations {
        // A lone anonymous operation.
        DocumentOperations::Single(_) => return None,
        DocumentOperations::Multiple(operations) => operations,
    };

    match requested {
        Some(requested) => operations
            .keys()
            .find(|name| name.as_str() == requested)
            .map(|name| name.to_string()),
        None => operations
            .into_iter()
            .min_by_key(|(_, operation)| (operation.pos.line, operation.pos.column))
            .map(|(name, _)| name.to_string()),
    }
}
