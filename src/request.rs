//  SPDX-FileCopyrightText: 2026
//  SPDX-License-Identifier: GPL-3.0-or-later

//! Request attribute categories and the `Request` type submitted to
//! the PDP for evaluation.
use crate::value::Bag;
use std::collections::HashMap;
use std::fmt;

/// A XACML attribute category, identified by URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(pub String);

impl Category {
    #[must_use]
    pub fn subject() -> Category {
        Category("urn:oasis:names:tc:xacml:1.0:subject-category:access-subject".to_owned())
    }
    #[must_use]
    pub fn resource() -> Category {
        Category("urn:oasis:names:tc:xacml:3.0:attribute-category:resource".to_owned())
    }
    #[must_use]
    pub fn action() -> Category {
        Category("urn:oasis:names:tc:xacml:3.0:attribute-category:action".to_owned())
    }
    #[must_use]
    pub fn environment() -> Category {
        Category("urn:oasis:names:tc:xacml:3.0:attribute-category:environment".to_owned())
    }
}

impl fmt::Display for Category {
    // This trait requires `fmt` with this exact signature.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An attribute's issuer, when a request attribute was asserted by a
/// specific authority.
pub type Issuer = String;

/// The key under which a request stores an attribute bag: its
/// category, attribute id, and (optional) issuer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    pub category: Category,
    pub attribute_id: String,
    pub issuer: Option<Issuer>,
}

/// The access request submitted for a decision: a set of categorized,
/// optionally-issuer-qualified attribute bags.
#[derive(Debug, Clone, Default)]
pub struct Request {
    attributes: HashMap<AttributeKey, Bag>,
}

impl Request {
    #[must_use]
    pub fn new() -> Self {
        Request::default()
    }

    pub fn insert(&mut self, category: Category, attribute_id: impl Into<String>, bag: Bag) {
        self.attributes.insert(
            AttributeKey {
                category,
                attribute_id: attribute_id.into(),
                issuer: None,
            },
            bag,
        );
    }

    pub fn insert_with_issuer(
        &mut self,
        category: Category,
        attribute_id: impl Into<String>,
        issuer: Issuer,
        bag: Bag,
    ) {
        self.attributes.insert(
            AttributeKey {
                category,
                attribute_id: attribute_id.into(),
                issuer: Some(issuer),
            },
            bag,
        );
    }

    /// Look up a bag by category, attribute id, and issuer.
    ///
    /// When `issuer` is `Some` and no exact match exists, an
    /// issuer-less bag for the same category/attribute-id is returned
    /// as a fallback, unless `strict` is set, mirroring XACML's
    /// default-lenient issuer matching (`strictAttributeIssuerMatch`
    /// in [`crate::config::Config`]).
    #[must_use]
    pub fn lookup(
        &self,
        category: &Category,
        attribute_id: &str,
        issuer: Option<&str>,
        strict: bool,
    ) -> Option<&Bag> {
        if let Some(iss) = issuer {
            let key = AttributeKey {
                category: category.clone(),
                attribute_id: attribute_id.to_owned(),
                issuer: Some(iss.to_owned()),
            };
            if let Some(bag) = self.attributes.get(&key) {
                return Some(bag);
            }
            if strict {
                return None;
            }
        }
        let key = AttributeKey {
            category: category.clone(),
            attribute_id: attribute_id.to_owned(),
            issuer: None,
        };
        self.attributes.get(&key)
    }
}
