use regex::Regex;
use scraper::{ElementRef, Html};

/// A parsed HTML page exposing the handful of lookups the extractor needs.
///
/// Every search walks elements in document order (pre-order), so "next"
/// means "later in the source", descendants of the anchor included.
pub struct Page {
    html: Html,
}

impl Page {
    pub fn parse(document: &str) -> Self {
        Page {
            html: Html::parse_document(document),
        }
    }

    fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
    }

    /// All elements matching `pred`, in document order.
    pub fn find_all<P>(&self, pred: P) -> Vec<ElementRef<'_>>
    where
        P: Fn(&ElementRef) -> bool,
    {
        self.elements().filter(|el| pred(el)).collect()
    }

    /// First element after `anchor` in document order that matches `pred`.
    pub fn find_next<'a, P>(&'a self, anchor: ElementRef<'a>, pred: P) -> Option<ElementRef<'a>>
    where
        P: Fn(&ElementRef) -> bool,
    {
        let anchor_id = anchor.id();
        self.elements()
            .skip_while(|el| el.id() != anchor_id)
            .skip(1)
            .find(|el| pred(el))
    }
}

/// First descendant of `scope` (excluding `scope` itself) matching `pred`.
pub fn find_within<'a, P>(scope: ElementRef<'a>, pred: P) -> Option<ElementRef<'a>>
where
    P: Fn(&ElementRef) -> bool,
{
    descendant_elements(scope).find(|el| pred(el))
}

/// Every descendant of `scope` matching `pred`, nested ones included.
pub fn find_all_within<'a, P>(scope: ElementRef<'a>, pred: P) -> Vec<ElementRef<'a>>
where
    P: Fn(&ElementRef) -> bool,
{
    descendant_elements(scope).filter(|el| pred(el)).collect()
}

fn descendant_elements(scope: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    scope.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Text nodes under `el`, each trimmed, empty ones dropped, joined with no separator.
pub fn text_content(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn is_tag(tag: &'static str) -> impl Fn(&ElementRef) -> bool {
    move |el| el.value().name() == tag
}

/// `<tag attr="...">` where the attribute value matches `pattern`.
pub fn attr_matches<'r>(
    tag: &'static str,
    attr: &'static str,
    pattern: &'r Regex,
) -> impl Fn(&ElementRef) -> bool + 'r {
    move |el| {
        el.value().name() == tag
            && el
                .value()
                .attr(attr)
                .is_some_and(|value| pattern.is_match(value))
    }
}

// ── Tests ──
