//! Recursive descriptor expansion.
//!
//! Expansion runs in two passes. The descriptor is first resolved into
//! [`NodeDescriptor`]s, which parses embedded JSON, applies the depth limit
//! and collects shape issues. Only then are host nodes created, depth first,
//! with each new node threaded down as the parent of its children.

use crate::BlockSpec;
use crate::BuilderConfig;
use crate::DescriptorIssue;
use crate::NodeDescriptor;
use crate::TreeBuilder;
use crate::descriptor::Resolver;
use crate::descriptor::parse_descriptor;
use bb_core::BlockError;
use bb_core::BlockResult;
use bb_dom::HostDocument;
use serde_json::Value;
use std::rc::Rc;

/// Outcome of one expansion call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionReport {
    pub nodes_created: usize,
    /// Branches skipped because their shape was wrong.
    pub issues: Vec<DescriptorIssue>,
}

impl ExpansionReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

pub(crate) fn from_json<D>(
    doc: &mut D,
    config: &Rc<BuilderConfig>,
    json: &str,
    parent: &D::Handle,
) -> BlockResult<ExpansionReport>
where
    D: HostDocument,
{
    let value = parse_descriptor(json)?;
    let mut resolver = Resolver::new(config);
    let descriptors = resolver.parsed(&value, "$", 1)?;
    let issues = resolver.issues;
    build_resolved(doc, config, &descriptors, issues, parent)
}

pub(crate) fn from_value<D>(
    doc: &mut D,
    config: &Rc<BuilderConfig>,
    value: &Value,
    parent: &D::Handle,
) -> BlockResult<ExpansionReport>
where
    D: HostDocument,
{
    let mut resolver = Resolver::new(config);
    let descriptors = resolver.value(value, "$", 1)?;
    let issues = resolver.issues;
    build_resolved(doc, config, &descriptors, issues, parent)
}

pub(crate) fn from_descriptors<D>(
    doc: &mut D,
    config: &Rc<BuilderConfig>,
    descriptors: &[NodeDescriptor],
    parent: &D::Handle,
) -> BlockResult<ExpansionReport>
where
    D: HostDocument,
{
    if let Some(max_depth) = config.max_depth {
        let depth = descriptors
            .iter()
            .map(NodeDescriptor::depth)
            .max()
            .unwrap_or(0);
        if depth > max_depth {
            return Err(BlockError::new(
                "descriptor.too_deep",
                format!("descriptors nest {depth} levels, limit is {max_depth}"),
            ));
        }
    }
    build_resolved(doc, config, descriptors, Vec::new(), parent)
}

fn build_resolved<D>(
    doc: &mut D,
    config: &Rc<BuilderConfig>,
    descriptors: &[NodeDescriptor],
    issues: Vec<DescriptorIssue>,
    parent: &D::Handle,
) -> BlockResult<ExpansionReport>
where
    D: HostDocument,
{
    if config.atomic {
        if let Some(issue) = issues.first() {
            return Err(BlockError::new(
                "descriptor.invalid_shape",
                format!("{issue} ({} issue(s), nothing built)", issues.len()),
            ));
        }
    }

    let mut report = ExpansionReport {
        nodes_created: 0,
        issues,
    };
    expand(doc, config, descriptors, parent, &mut report)?;
    tracing::debug!(
        nodes_created = report.nodes_created,
        issues = report.issues.len(),
        "expanded tree descriptor"
    );
    Ok(report)
}

fn expand<D>(
    doc: &mut D,
    config: &Rc<BuilderConfig>,
    descriptors: &[NodeDescriptor],
    parent: &D::Handle,
    report: &mut ExpansionReport,
) -> BlockResult<()>
where
    D: HostDocument,
{
    for descriptor in descriptors {
        let node = TreeBuilder::with_config(doc, BlockSpec::from(descriptor), Rc::clone(config))?;
        doc.append_child(parent, node.element())?;
        report.nodes_created += 1;
        expand(doc, config, &descriptor.children, node.element(), report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::BlockSpec;
    use crate::BuilderConfig;
    use crate::NodeDescriptor;
    use crate::TreeBuilder;
    use bb_core::BlockResult;
    use bb_dom::ArenaDocument;
    use bb_dom::HostDocument;
    use serde_json::Value;
    use serde_json::json;
    use tracing_test::traced_test;

    fn root(doc: &mut ArenaDocument) -> BlockResult<TreeBuilder<u64>> {
        TreeBuilder::new(doc, BlockSpec::new("main"))
    }

    #[test]
    fn array_descriptor_appends_in_order() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let root = root(&mut doc)?;
        let report = root.children_from_json(
            &mut doc,
            r#"[{"tag":"span","text":"a"},{"tag":"span","text":"b"}]"#,
        )?;

        let spans = doc.children(*root.element()).to_vec();
        assert_eq!(report.nodes_created, 2);
        assert!(report.is_clean());
        assert_eq!(spans.len(), 2);
        assert_eq!(doc.tag_name(spans[0]), Some("span"));
        assert_eq!(doc.text_content(spans[0]), "a");
        assert_eq!(doc.text_content(spans[1]), "b");
        Ok(())
    }

    #[test]
    fn nested_children_keep_ancestry() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let root = root(&mut doc)?;
        root.children_from_value(
            &mut doc,
            &json!({ "tag": "div", "children": [{ "tag": "p", "text": "x" }] }),
        )?;

        assert_eq!(
            doc.outline(*root.element()),
            "<main><div><p>x</p></div></main>"
        );
        Ok(())
    }

    #[test]
    fn scalar_descriptor_builds_nothing_and_reports() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let root = root(&mut doc)?;
        let before = doc.node_count();
        let report = root.children_from_json(&mut doc, "\"not an object\"")?;

        assert_eq!(report.nodes_created, 0);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].path, "$");
        assert_eq!(doc.node_count(), before);
        Ok(())
    }

    fn expand_scalar_text() -> BlockResult<usize> {
        let mut doc = ArenaDocument::new();
        let root = root(&mut doc)?;
        let report = root.children_from_json(&mut doc, "\"not an object\"")?;
        Ok(report.issues.len())
    }

    #[traced_test]
    #[test]
    fn scalar_descriptor_logs_invalid_tree_warning() {
        assert_eq!(expand_scalar_text(), Ok(1));
        assert!(logs_contain("invalid tree descriptor"));
        assert!(logs_contain("expected an object or an array, found a string"));
    }

    #[test]
    fn deeply_nested_text_matches_value_form() -> BlockResult<()> {
        let mut descriptor = json!({ "tag": "i" });
        for _ in 0..130 {
            descriptor = json!({ "children": descriptor });
        }
        let text = descriptor.to_string();

        let mut from_text = ArenaDocument::new();
        let text_root = root(&mut from_text)?;
        let text_report = text_root.children_from_json(&mut from_text, &text)?;

        let mut from_value = ArenaDocument::new();
        let value_root = root(&mut from_value)?;
        let value_report = value_root.children_from_value(&mut from_value, &descriptor)?;

        assert_eq!(text_report.nodes_created, 131);
        assert_eq!(value_report.nodes_created, 131);
        assert_eq!(
            from_text.outline(*text_root.element()),
            from_value.outline(*value_root.element())
        );

        let nested = text_root.children_from_value(&mut from_text, &Value::String(text))?;
        assert_eq!(nested.nodes_created, 131);
        Ok(())
    }

    #[test]
    fn string_and_value_forms_match() -> BlockResult<()> {
        let mut from_text = ArenaDocument::new();
        let text_root = root(&mut from_text)?;
        text_root.children_from_json(&mut from_text, r#"{"tag":"b","text":"z"}"#)?;

        let mut from_value = ArenaDocument::new();
        let value_root = root(&mut from_value)?;
        value_root.children_from_value(&mut from_value, &json!({ "tag": "b", "text": "z" }))?;

        let mut from_string_value = ArenaDocument::new();
        let string_root = root(&mut from_string_value)?;
        string_root.children_from_value(
            &mut from_string_value,
            &json!(r#"{"tag":"b","text":"z"}"#),
        )?;

        let expected = "<main><b>z</b></main>";
        assert_eq!(from_text.outline(*text_root.element()), expected);
        assert_eq!(from_value.outline(*value_root.element()), expected);
        assert_eq!(from_string_value.outline(*string_root.element()), expected);
        Ok(())
    }

    #[test]
    fn malformed_json_propagates() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let root = root(&mut doc)?;
        let result = root.children_from_json(&mut doc, "{\"tag\": ");

        assert!(result.is_err_and(|error| error.is("descriptor.malformed_json")));
        assert!(doc.children(*root.element()).is_empty());
        Ok(())
    }

    #[test]
    fn invalid_branch_is_skipped_in_partial_mode() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let root = root(&mut doc)?;
        let report = root.children_from_value(
            &mut doc,
            &json!([
                { "tag": "h1", "text": "Title" },
                null,
                { "tag": "section", "children": [true, { "tag": "p", "text": "body" }] }
            ]),
        )?;

        assert_eq!(report.nodes_created, 3);
        assert_eq!(report.issues.len(), 2);
        assert_eq!(
            doc.outline(*root.element()),
            "<main><h1>Title</h1><section><p>body</p></section></main>"
        );
        Ok(())
    }

    #[test]
    fn atomic_mode_builds_nothing_on_invalid_branch() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let root = TreeBuilder::with_config(
            &mut doc,
            BlockSpec::new("main"),
            BuilderConfig::atomic(),
        )?;
        let before = doc.node_count();
        let result = root.children_from_value(
            &mut doc,
            &json!([{ "tag": "h1" }, { "tag": "ul", "children": 5 }]),
        );

        assert!(result.is_err_and(|error| error.is("descriptor.invalid_shape")));
        assert_eq!(doc.node_count(), before);
        Ok(())
    }

    #[test]
    fn parent_override_redirects_the_subtree() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let root = root(&mut doc)?;
        let aside = TreeBuilder::new(&mut doc, BlockSpec::new("aside"))?;
        root.children_from_json_under(&mut doc, r#"{"tag":"nav"}"#, &aside)?;

        let sidebar = doc.create_element("div")?;
        root.children_from_value_under(
            &mut doc,
            &json!({ "tag": "a", "attr": { "href": "/" } }),
            crate::Attachment::NativeHandle(sidebar),
        )?;

        assert!(doc.children(*root.element()).is_empty());
        assert_eq!(doc.outline(*aside.element()), "<aside><nav></nav></aside>");
        assert_eq!(doc.outline(sidebar), "<div><a href=\"/\"></a></div>");
        Ok(())
    }

    #[test]
    fn children_inherit_builder_config() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let config = BuilderConfig {
            default_tag: "section".to_owned(),
            ..BuilderConfig::default()
        };
        let root = TreeBuilder::with_config(&mut doc, BlockSpec::new("main"), config)?;
        root.children_from_json(&mut doc, r#"{"attr":{"class":"card"},"children":[{}]}"#)?;

        assert_eq!(
            doc.outline(*root.element()),
            "<main><section className=\"card\"><section></section></section></main>"
        );
        Ok(())
    }

    #[test]
    fn typed_descriptors_respect_depth_limit() -> BlockResult<()> {
        let mut doc = ArenaDocument::new();
        let config = BuilderConfig {
            max_depth: Some(1),
            ..BuilderConfig::default()
        };
        let root = TreeBuilder::with_config(&mut doc, BlockSpec::new("main"), config)?;
        let flat = NodeDescriptor {
            tag: Some("p".to_owned()),
            ..NodeDescriptor::default()
        };
        let nested = NodeDescriptor {
            children: vec![flat.clone()],
            ..NodeDescriptor::default()
        };

        let report = root.children_from_descriptors(&mut doc, &[flat])?;
        assert_eq!(report.nodes_created, 1);
        let result = root.children_from_descriptors(&mut doc, &[nested]);
        assert!(result.is_err_and(|error| error.is("descriptor.too_deep")));
        Ok(())
    }
}
