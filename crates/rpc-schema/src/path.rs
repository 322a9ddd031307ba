// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Value paths reported in validation errors.
//!
//! The root is the empty string, object properties are joined with `.` and array elements use
//! `[index]`: `posts[2].title`.

pub fn property(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}.{name}")
    }
}

pub fn index(parent: &str, index: usize) -> String {
    format!("{parent}[{index}]")
}

/// Re-root a path produced by a nested validator (such as a custom type) under `parent`.
pub fn prefix(parent: &str, child: &str) -> String {
    if child.is_empty() {
        parent.to_string()
    } else if parent.is_empty() || child.starts_with('[') {
        format!("{parent}{child}")
    } else {
        format!("{parent}.{child}")
    }
}
