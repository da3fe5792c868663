//! The host HTML page.
//!
//! The page loads Vue 3 and Element Plus from the configured CDN, embeds the
//! payload and render context as JSON literals, and ships a small client that
//! renders the payload recursively and posts events back to `/api/event`.

use serde::Serialize;
use serde_json::{Map, Value};

use super::payload::Payload;
use super::RenderError;
use crate::config::PageConfig;

/// Escape text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serialize `value` for embedding inside a `<script>` element.
///
/// `</` is written as `<\/` so the payload cannot close the script early.
pub fn script_json<T: Serialize + ?Sized>(value: &T) -> Result<String, RenderError> {
    Ok(serde_json::to_string_pretty(value)?.replace("</", "<\\/"))
}

const PAGE_STYLE: &str = r#"
  body {
    margin: 0;
    padding: 20px;
    font-family: 'Helvetica Neue', Helvetica, Arial, sans-serif;
    background-color: #f5f7fa;
  }
  #app { max-width: 1200px; margin: 0 auto; }
  .trellis-loading {
    display: flex;
    justify-content: center;
    align-items: center;
    height: 200px;
    color: #909399;
  }
  @media (max-width: 768px) { body { padding: 10px; } }
"#;

/// The client runtime. Reads `window.__TRELLIS_PAYLOAD__`.
pub const CLIENT_BOOTSTRAP: &str = r#"
(function () {
  const { createApp, reactive, ref, onMounted } = Vue;

  const components = reactive(window.__TRELLIS_PAYLOAD__ || []);
  const globalState = reactive({});
  let inFlight = false;

  function findComponent(list, id) {
    for (const item of list) {
      if (!item || typeof item !== 'object') continue;
      if (item.id === id) return item;
      const nested = findComponent(item.children || [], id);
      if (nested) return nested;
    }
    return null;
  }

  function toast(message, type, duration) {
    ElementPlus.ElMessage({ message, type, duration });
  }

  function applyResponse(data) {
    if (!data.success) {
      toast(data.error || 'Request failed', 'error', 3000);
      return;
    }
    const payload = data.data;
    if (payload && typeof payload === 'object') {
      if (payload.notification) {
        const n = payload.notification;
        toast(n.message, n.type || 'info', 3000);
      }
      if (payload.modal) {
        const m = payload.modal;
        ElementPlus.ElMessageBox.alert(m.message, m.title, { type: m.type || 'info' });
      }
      if (payload.redirect) {
        window.location.href = payload.redirect;
      }
      if (payload.reload) {
        window.location.reload();
      }
      if (payload.component_update) {
        const update = payload.component_update;
        const target = findComponent(components, update.id);
        if (target) Object.assign(target.props, update.updates);
      }
      if (payload.state_update) {
        Object.assign(globalState, payload.state_update);
      }
    }
    if (data.message && !payload) {
      toast(data.message, 'success', 2000);
    }
  }

  function handleEvent(componentId, eventName, event) {
    if (event && event.preventDefault) event.preventDefault();
    if (inFlight) return false;
    inFlight = true;

    const body = {
      component_id: componentId,
      event: eventName,
      params: {
        target: event && event.target ? event.target.value : event,
        timestamp: new Date().toISOString()
      }
    };

    fetch('/api/event', {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body)
    })
      .then((response) => response.json())
      .then(applyResponse)
      .catch((error) => {
        console.error('event dispatch failed', error);
        toast('Network error, please retry', 'error', 3000);
      })
      .finally(() => { inFlight = false; });
    return false;
  }

  function listenerName(eventName) {
    return 'on' + eventName.charAt(0).toUpperCase() + eventName.slice(1);
  }

  const TrellisNode = {
    name: 'TrellisNode',
    props: { component: { type: Object, required: true } },
    setup(props) {
      const bindAttrs = () => {
        const attrs = { ...props.component.props };
        Object.entries(props.component.events || {}).forEach(([eventName, instruction]) => {
          attrs[listenerName(eventName)] = (event) => {
            if (instruction.type === 'script') {
              new Function('event', instruction.code)(event);
            } else {
              handleEvent(instruction.component_id, instruction.event, event);
            }
          };
        });
        return attrs;
      };
      return { bindAttrs };
    },
    template: `
      <component :is="component.component" v-bind="bindAttrs()">
        <template v-for="(child, index) in component.children" :key="(child && child.id) || index">
          <trellis-node v-if="child && typeof child === 'object'" :component="child" />
          <template v-else>{{ child }}</template>
        </template>
      </component>
    `
  };

  const app = createApp({
    setup() {
      const loading = ref(true);
      onMounted(() => { loading.value = false; });
      return { loading, components, globalState };
    }
  });
  app.component('trellis-node', TrellisNode);
  app.use(ElementPlus);
  app.mount('#app');

  window.trellis = { handleEvent, findComponent, state: globalState };
})();
"#;

/// Produce the full HTML document.
pub fn render_page(
    page: &PageConfig,
    title: &str,
    payload: &[Payload],
    context: &Map<String, Value>,
) -> Result<String, RenderError> {
    let title = escape_html(page.title.as_deref().unwrap_or(title));
    let payload_json = script_json(payload)?;
    let context_json = script_json(context)?;

    let mut html = String::with_capacity(payload_json.len() + CLIENT_BOOTSTRAP.len() + 2048);
    html.push_str("<!DOCTYPE html>\n");
    html.push_str(&format!("<html lang=\"{}\">\n<head>\n", escape_html(&page.lang)));
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str("  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    html.push_str(&format!("  <title>{title}</title>\n"));
    html.push_str(&format!(
        "  <link rel=\"stylesheet\" href=\"{}\">\n",
        escape_html(&page.element_plus_css)
    ));
    html.push_str(&format!("  <script src=\"{}\"></script>\n", escape_html(&page.vue_js)));
    html.push_str(&format!(
        "  <script src=\"{}\"></script>\n",
        escape_html(&page.element_plus_js)
    ));
    html.push_str(&format!("  <style>{PAGE_STYLE}</style>\n"));
    html.push_str("</head>\n<body>\n");
    html.push_str("  <div id=\"app\">\n");
    html.push_str("    <div v-if=\"loading\" class=\"trellis-loading\">Loading...</div>\n");
    html.push_str("    <div v-else>\n");
    html.push_str("      <trellis-node v-for=\"item in components\" :key=\"item.id\" :component=\"item\" />\n");
    html.push_str("    </div>\n  </div>\n");
    html.push_str(&format!(
        "  <script>\n    window.__TRELLIS_PAYLOAD__ = {payload_json};\n    window.__TRELLIS_CONTEXT__ = {context_json};\n  </script>\n"
    ));
    html.push_str(&format!("  <script>{CLIENT_BOOTSTRAP}</script>\n"));
    html.push_str("</body>\n</html>\n");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::payload::PayloadChild;
    use std::collections::BTreeMap;

    fn payload_with_text(text: &str) -> Vec<Payload> {
        vec![Payload {
            id: "p".into(),
            component: "p".into(),
            props: Map::new(),
            events: BTreeMap::new(),
            children: vec![PayloadChild::Literal(Value::String(text.into()))],
        }]
    }

    #[test]
    fn escape_html_covers_specials() {
        insta::assert_snapshot!(escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#), @"&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;");
    }

    #[test]
    fn script_close_is_escaped() {
        let html = render_page(
            &PageConfig::default(),
            "Demo",
            &payload_with_text("</script><script>alert(1)</script>"),
            &Map::new(),
        )
        .unwrap();
        assert!(!html.contains("</script><script>alert(1)"));
        assert!(html.contains(r"<\/script><script>alert(1)<\/script>"));
    }

    #[test]
    fn page_embeds_payload_context_and_config() {
        let mut context = Map::new();
        context.insert("user".into(), Value::String("ada".into()));
        let page = PageConfig {
            lang: "en".into(),
            ..PageConfig::default()
        };
        let html = render_page(&page, "My <App>", &payload_with_text("hi"), &context).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("<title>My &lt;App&gt;</title>"));
        assert!(html.contains("window.__TRELLIS_PAYLOAD__"));
        assert!(html.contains("\"user\": \"ada\""));
        assert!(html.contains(&page.vue_js));
        assert!(html.contains("/api/event"));
    }

    #[test]
    fn configured_title_overrides_app_name() {
        let page = PageConfig {
            title: Some("Override".into()),
            ..PageConfig::default()
        };
        let html = render_page(&page, "App", &[], &Map::new()).unwrap();
        assert!(html.contains("<title>Override</title>"));
    }
}
