mod google_calendar_mock;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: configuration and knowledge base indexing
// - google_calendar_mock: the assistant driven end to end with a mock calendar
// - google_calendar_http: the REST client and token refresh against a local server
// - shutdown_tests: the binary leaving a session on SIGINT/SIGTERM while stdin is open
