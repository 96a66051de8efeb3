// Copyright (c) 2025 Kilo Search Authors
//
// Licensed under the MIT License (LICENSE or https://opensource.org/licenses/MIT)

//! Property-based and stress tests for the Kilo Trie.

mod property_tests;
