//! Pin vector tests.
