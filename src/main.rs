use nu_plugin::{serve_plugin, MsgPackSerializer};
use nu_plugin_instacheck::InstacheckPlugin;

fn main() {
    serve_plugin(&InstacheckPlugin, MsgPackSerializer {})
}
