//! Cross-module flow tests.
