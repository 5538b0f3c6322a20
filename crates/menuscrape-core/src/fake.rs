//! In-memory page for exercising the detector and extractor without a browser.
//!
//! Supports the selector shapes the storefront config uses: `tag`, `#id`,
//! `tag[attr="v"]` and `tag[attr^="v"]`.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ScrapeError;
use crate::page::MenuPage;

/// Markup tree used to build a `FakePage`.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<Node>,
}

impl Node {
    pub(crate) fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub(crate) fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub(crate) fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }
}

/// A storefront item: eight nested wrapper divs, the name/price pair in the
/// seventh, the description span in the eighth.
pub(crate) fn store_item(index: usize, name: &str, price: &str, description: Option<&str>) -> Node {
    let rich = |text: &str| Node::new("span").attr("data-testid", "rich-text").text(text);

    let mut inner = Node::new("div").child(rich(name)).child(rich(price));
    if let Some(description) = description {
        inner = inner.child(Node::new("div").child(Node::new("span").text(description)));
    }
    let mut wrapped = inner;
    for _ in 0..6 {
        wrapped = Node::new("div").child(wrapped);
    }

    Node::new("li")
        .attr("data-testid", &format!("store-item-{}", index))
        .child(wrapped)
}

pub(crate) fn footer() -> Node {
    Node::new("footer").attr("id", "footer")
}

#[derive(Debug)]
struct Flat {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<usize>,
}

/// A fake document plus a log of the calls made against it.
pub(crate) struct FakePage {
    nodes: Vec<Flat>,
    count_script: Option<Box<dyn Fn(usize) -> usize + Send + Sync>>,
    samples: Mutex<usize>,
    calls: Mutex<Vec<String>>,
}

impl FakePage {
    pub(crate) fn new(body: Vec<Node>) -> Self {
        let mut nodes = vec![Flat {
            tag: "#document".to_string(),
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }];
        for node in body {
            let id = flatten(&mut nodes, node);
            nodes[0].children.push(id);
        }
        Self {
            nodes,
            count_script: None,
            samples: Mutex::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Report `script(n)` as the result of the `n`th `count` call.
    pub(crate) fn with_count_script(mut self, script: impl Fn(usize) -> usize + Send + Sync + 'static) -> Self {
        self.count_script = Some(Box::new(script));
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub(crate) fn calls_starting_with(&self, prefix: &str) -> usize {
        self.calls.lock().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn log(&self, call: String) {
        self.calls.lock().push(call);
    }

    fn descendants(&self, scope: usize, out: &mut Vec<usize>) {
        for &child in &self.nodes[scope].children {
            out.push(child);
            self.descendants(child, out);
        }
    }

    fn select(&self, scope: usize, selector: &str) -> Vec<usize> {
        let selector = Selector::parse(selector);
        let mut all = Vec::new();
        self.descendants(scope, &mut all);
        all.into_iter()
            .filter(|&id| selector.matches(&self.nodes[id]))
            .collect()
    }

    fn text_of(&self, id: usize) -> String {
        let mut text = self.nodes[id].text.clone();
        for &child in &self.nodes[id].children {
            text.push_str(&self.text_of(child));
        }
        text
    }
}

fn flatten(nodes: &mut Vec<Flat>, node: Node) -> usize {
    let id = nodes.len();
    nodes.push(Flat {
        tag: node.tag,
        attrs: node.attrs,
        text: node.text,
        children: Vec::new(),
    });
    for child in node.children {
        let child_id = flatten(nodes, child);
        nodes[id].children.push(child_id);
    }
    id
}

struct Selector {
    tag: Option<String>,
    id: Option<String>,
    attr: Option<(String, bool, String)>,
}

impl Selector {
    fn parse(selector: &str) -> Self {
        if let Some(id) = selector.strip_prefix('#') {
            return Self {
                tag: None,
                id: Some(id.to_string()),
                attr: None,
            };
        }
        match selector.split_once('[') {
            Some((tag, rest)) => {
                let rest = rest.trim_end_matches(']');
                let (name, prefix, value) = match rest.split_once("^=") {
                    Some((name, value)) => (name, true, value),
                    None => {
                        let (name, value) = rest.split_once('=').unwrap_or((rest, ""));
                        (name, false, value)
                    }
                };
                Self {
                    tag: Some(tag.to_string()),
                    id: None,
                    attr: Some((name.to_string(), prefix, value.trim_matches('"').to_string())),
                }
            }
            None => Self {
                tag: Some(selector.to_string()),
                id: None,
                attr: None,
            },
        }
    }

    fn matches(&self, node: &Flat) -> bool {
        let attr = |name: &str| {
            node.attrs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.as_str())
        };
        if let Some(tag) = &self.tag {
            if &node.tag != tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if attr("id") != Some(id.as_str()) {
                return false;
            }
        }
        if let Some((name, prefix, value)) = &self.attr {
            match attr(name) {
                Some(actual) if *prefix => actual.starts_with(value.as_str()),
                Some(actual) => actual == value,
                None => false,
            }
        } else {
            true
        }
    }
}

#[async_trait]
impl MenuPage for FakePage {
    type Element = usize;

    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.log(format!("goto {}", url));
        if url.starts_with("bad://") {
            return Err(ScrapeError::Navigation(format!("{}: net::ERR_ABORTED", url)));
        }
        Ok(())
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<usize, ScrapeError> {
        self.log(format!("wait_for {}", selector));
        match self.select(0, selector).first() {
            Some(&id) => Ok(id),
            None => {
                tokio::time::sleep(timeout).await;
                Err(ScrapeError::NotFound(format!(
                    "'{}' did not appear within {}ms",
                    selector,
                    timeout.as_millis()
                )))
            }
        }
    }

    async fn scroll_into_view(&self, element: &usize) -> Result<(), ScrapeError> {
        self.log(format!("scroll {}", element));
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<usize>, ScrapeError> {
        self.log(format!("query_all {}", selector));
        Ok(self.select(0, selector))
    }

    async fn query_all_within(&self, scope: &usize, selector: &str) -> Result<Vec<usize>, ScrapeError> {
        Ok(self.select(*scope, selector))
    }

    async fn query_within(&self, scope: &usize, selector: &str) -> Result<Option<usize>, ScrapeError> {
        Ok(self.select(*scope, selector).first().copied())
    }

    async fn inner_text(&self, element: &usize) -> Result<String, ScrapeError> {
        Ok(self.text_of(*element))
    }

    async fn count(&self, selector: &str) -> Result<usize, ScrapeError> {
        self.log(format!("count {}", selector));
        let sample = {
            let mut samples = self.samples.lock();
            let current = *samples;
            *samples += 1;
            current
        };
        match &self.count_script {
            Some(script) => Ok(script(sample)),
            None => Ok(self.select(0, selector).len()),
        }
    }
}
