//! Descriptor-driven mapping of raw JSON onto typed AST nodes

use super::error::SyntaxError;
use crate::ast::{Collection, Node, NodeKind};
use crate::config::compile_time::syntax::{MAX_NESTING_DEPTH, MAX_SYNTAX_ERRORS};
use crate::config::runtime::SyntaxPreferences;
use crate::logging::codes;
use crate::parsers::{NodeBuilder, ValueParsingError};
use crate::properties::AstNode;
use crate::registry::{CollectionRole, FormatRegistries, ManifestFormat};
use crate::utils::{display_value, Location};
use crate::{log_debug, log_error, log_info, log_success};
use serde_json::Value;
use std::time::Instant;

const LINKS_KEY: &str = "links";

/// Builds AST nodes for one document format
///
/// Every field failure is recorded and the field left at its default, so a
/// single bad value never discards its siblings. Errors are reset at the start
/// of each [`SyntaxAnalyzer::analyze`] call.
#[derive(Debug, Clone)]
pub struct SyntaxAnalyzer {
    registries: FormatRegistries,
    preferences: SyntaxPreferences,
    location: Location,
    depth: usize,
    errors: Vec<SyntaxError>,
    /// The next node's `links` came from a bare array at the current location
    inline_links: bool,
}

impl SyntaxAnalyzer {
    pub fn new(format: ManifestFormat) -> Self {
        Self::with_preferences(
            FormatRegistries::for_format(format).clone(),
            SyntaxPreferences::default(),
        )
    }

    pub fn with_preferences(registries: FormatRegistries, preferences: SyntaxPreferences) -> Self {
        Self {
            registries,
            preferences,
            location: Location::root(),
            depth: 0,
            errors: Vec::new(),
            inline_links: false,
        }
    }

    pub fn format(&self) -> ManifestFormat {
        self.registries.format
    }

    pub fn registries(&self) -> &FormatRegistries {
        &self.registries
    }

    /// Build a root node of type `T` together with every error recorded on the way
    ///
    /// Fails only when `raw` is not a JSON object.
    pub fn analyze<T: AstNode>(
        &mut self,
        raw: &Value,
    ) -> Result<(T, Vec<SyntaxError>), ValueParsingError> {
        let start = Instant::now();
        self.location = Location::root();
        self.depth = 0;
        self.errors.clear();
        self.inline_links = false;

        log_info!("Starting syntax analysis",
            "format" => self.format(),
            "root" => T::KIND.name()
        );

        let root = self.analyze_node::<T>(raw)?;
        let errors = std::mem::take(&mut self.errors);

        log_success!(
            codes::success::SYNTAX_ANALYSIS_COMPLETE,
            "Syntax analysis completed",
            "errors" => errors.len(),
            "duration_ms" => format!("{:.2}", start.elapsed().as_secs_f64() * 1000.0)
        );

        Ok((root, errors))
    }

    /// Fill a `T` from the fields of a raw object
    pub(crate) fn analyze_node<T: AstNode>(&mut self, raw: &Value) -> Result<T, ValueParsingError> {
        let Value::Object(object) = raw else {
            return Err(ValueParsingError::new(
                raw,
                format!(
                    "Value '{}' must be an instance of '{}'",
                    display_value(raw),
                    T::KIND.name()
                ),
            ));
        };

        let links_inline = std::mem::take(&mut self.inline_links);
        let format = self.format();
        let mut node = T::default();

        for descriptor in T::descriptors().iter().filter(|d| d.applies_to(format)) {
            let Some(value) = object.get(descriptor.key) else {
                if descriptor.required {
                    let location = self.location.child_key(descriptor.key);
                    self.record(SyntaxError::missing_property(
                        T::KIND,
                        descriptor.name,
                        descriptor.key,
                        location,
                    ));
                }
                continue;
            };

            let inline = links_inline && descriptor.key == LINKS_KEY;
            if !inline {
                self.location.push_key(descriptor.key);
            }
            let checkpoint = self.checkpoint();
            match descriptor.parser.parse(value, self) {
                Ok(parsed) => {
                    let found = parsed.type_name();
                    if !descriptor.assign(&mut node, parsed) {
                        let location = self.location.clone();
                        self.record(SyntaxError::unexpected_value_type(
                            T::KIND,
                            descriptor.name,
                            location,
                            found,
                        ));
                    }
                }
                Err(error) => {
                    // Errors from nested nodes of the failed value would duplicate this one
                    self.rollback(checkpoint);
                    let location = self.location.clone();
                    self.record(SyntaxError::from_parsing(
                        T::KIND,
                        descriptor.name,
                        location,
                        error,
                    ));
                }
            }
            if !inline {
                self.location.pop();
            }
        }

        for (key, value) in object {
            let is_field = T::descriptors()
                .iter()
                .any(|d| d.key == key && d.applies_to(format));
            if is_field {
                continue;
            }

            if node.sub_collections_mut().is_some() {
                if let Some(role) = self.registries.role(key).copied() {
                    if let Some(collection) = self.analyze_sub_collection(T::KIND, role, value) {
                        if let Some(sub_collections) = node.sub_collections_mut() {
                            sub_collections.push(collection);
                        }
                    }
                    continue;
                }
            }

            if self.preferences.preserve_extra_fields {
                if let Some(extra) = node.extra_mut() {
                    extra.insert(key.clone(), value.clone());
                }
            }
        }

        Ok(node)
    }

    /// A role-keyed value: an array of links, or a collection object
    fn analyze_sub_collection(
        &mut self,
        parent: NodeKind,
        role: CollectionRole,
        raw: &Value,
    ) -> Option<Collection> {
        self.location.push_key(role.key);
        let checkpoint = self.checkpoint();

        let result = match raw {
            Value::Array(_) => {
                self.inline_links = true;
                let collection = self.nested_collection(&serde_json::json!({ LINKS_KEY: raw }));
                self.inline_links = false;
                collection
            }
            Value::Object(object) => {
                if !role.compact && !object.contains_key("metadata") {
                    let location = self.location.child_key("metadata");
                    self.record(SyntaxError::missing_property(
                        NodeKind::Collection,
                        "metadata",
                        "metadata",
                        location,
                    ));
                }
                self.nested_collection(raw)
            }
            _ => Err(ValueParsingError::new(
                raw,
                format!(
                    "Value '{}' must be an instance of '{}'",
                    display_value(raw),
                    NodeKind::Collection.name()
                ),
            )),
        };

        let collection = match result {
            Ok(mut collection) => {
                collection.role = Some(role);
                Some(collection)
            }
            Err(error) => {
                self.rollback(checkpoint);
                let location = self.location.clone();
                self.record(SyntaxError::from_parsing(parent, role.key, location, error));
                None
            }
        };

        self.location.pop();
        collection
    }

    fn nested_collection(&mut self, raw: &Value) -> Result<Collection, ValueParsingError> {
        self.enter(raw)?;
        let collection = self.analyze_node::<Collection>(raw);
        self.depth -= 1;
        collection
    }

    fn enter(&mut self, raw: &Value) -> Result<(), ValueParsingError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ValueParsingError::nesting_too_deep(raw, MAX_NESTING_DEPTH));
        }
        self.depth += 1;
        Ok(())
    }

    fn record(&mut self, error: SyntaxError) {
        if self.errors.len() > MAX_SYNTAX_ERRORS {
            return;
        }
        if self.errors.len() == MAX_SYNTAX_ERRORS {
            let limit = SyntaxError::ErrorLimitReached {
                limit: MAX_SYNTAX_ERRORS,
            };
            log_error!(limit.error_code(), &limit.to_string());
            self.errors.push(limit);
            return;
        }

        if self.preferences.log_field_errors {
            log_debug!("Recorded syntax error",
                "code" => error.error_code(),
                "location" => error.location().map(ToString::to_string).unwrap_or_default(),
                "message" => error.message()
            );
        }
        self.errors.push(error);
    }
}

impl NodeBuilder for SyntaxAnalyzer {
    fn build_node(&mut self, kind: NodeKind, raw: &Value) -> Result<Node, ValueParsingError> {
        self.enter(raw)?;
        let node = kind.construct(self, raw);
        self.depth -= 1;
        node
    }

    fn build_link_array(&mut self, kind: NodeKind, links: &Value) -> Result<Node, ValueParsingError> {
        self.enter(links)?;
        self.inline_links = true;
        let node = kind.construct(self, &serde_json::json!({ LINKS_KEY: links }));
        self.inline_links = false;
        self.depth -= 1;
        node
    }

    fn push_key(&mut self, key: &str) {
        self.location.push_key(key);
    }

    fn push_index(&mut self, index: usize) {
        self.location.push_index(index);
    }

    fn pop(&mut self) {
        self.location.pop();
    }

    fn checkpoint(&self) -> usize {
        self.errors.len()
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.errors.truncate(checkpoint);
    }

    fn accepts_boolean_strings(&self) -> bool {
        self.preferences.allow_boolean_strings
    }
}
