//! URL construction for the `<table>.do?JSONv2` endpoint.

use url::form_urlencoded::Serializer;

use crate::types::{Action, DisplayOptions};

/// Query parameters for one call, in wire order.
#[derive(Debug, Clone)]
pub struct QueryParams<'a> {
    action: Action,
    pairs: Vec<(&'static str, &'a str)>,
}

impl<'a> QueryParams<'a> {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            pairs: Vec::new(),
        }
    }

    /// Encoded filter, passed through untouched apart from percent-encoding.
    pub fn query(mut self, query: &'a str) -> Self {
        self.pairs.push(("sysparm_query", query));
        self
    }

    pub fn sys_id(mut self, id: &'a str) -> Self {
        self.pairs.push(("sysparm_sys_id", id));
        self
    }

    pub fn display(mut self, opts: DisplayOptions) -> Self {
        self.pairs.push(("displayvalue", bool_str(opts.display_value)));
        self.pairs
            .push(("displayvariables", bool_str(opts.display_variables)));
        self
    }

    pub fn encode(&self) -> String {
        let mut serializer = Serializer::new(String::new());
        serializer.append_pair("sysparm_action", self.action.as_str());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        // The service expects %20, not the form encoding's '+'. A literal '+'
        // is already escaped as %2B at this point, and a literal '%' as %25,
        // so the unescapes below only ever touch bytes the serializer wrote.
        let mut encoded = serializer.finish().replace('+', "%20");
        for (escaped, raw) in UNRESERVED_MARKS {
            encoded = encoded.replace(escaped, raw);
        }
        encoded
    }
}

/// Characters the service's own encoder leaves as-is but form encoding escapes.
const UNRESERVED_MARKS: [(&str, &str); 5] = [
    ("%7E", "~"),
    ("%21", "!"),
    ("%27", "'"),
    ("%28", "("),
    ("%29", ")"),
];

/// `<base_url>/<table>.do?JSONv2=&<params>`
pub fn endpoint_url(base_url: &str, table: &str, params: &QueryParams<'_>) -> String {
    format!("{base_url}/{table}.do?JSONv2=&{}", params.encode())
}

fn bool_str(flag: bool) -> &'static str {
    if flag {
        "true"
    } else {
        "false"
    }
}
