pub mod host;

use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::channel::{ContactsPlugin, MethodResult, Reply};
use host::Line;

/// Serve method calls read from stdin, one JSON reply per line on stdout.
pub fn run(plugin: &ContactsPlugin) {
    debug!(channel = plugin.channel_name(), "serving method calls on stdin");
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!(error = %e, "failed to read stdin");
                break;
            }
        };

        let output = match host::parse_line(&line) {
            Line::Blank => continue,
            Line::Exit => break,
            Line::Help => {
                print_help();
                continue;
            }
            Line::Bad(message) => host::render(Some(MethodResult::error("BAD_CALL", message))),
            Line::Call(call) => {
                let (reply, pending) = Reply::channel();
                plugin.handle(call, reply);
                host::render(pending.blocking_wait())
            }
        };

        if writeln!(stdout, "{}", output).and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }
}

fn print_help() {
    println!(r#"
METHOD CALLS (one per line):

  {{"method": "<name>", "arguments": {{...}}}}
  <name> [json-arguments]

  getContacts              query?, withThumbnails, photoHighResolution,
                           orderByGivenName, androidLocalizedLabels
  getContactsForPhone      phone, plus the getContacts flags
  getContactsForEmail      email, plus the getContacts flags
  getAvatar                contact, photoHighResolution
  addContact               contact map
  updateContact            contact map
  deleteContact            contact map
  openExistingContact      contact
  openContactForm
  openDeviceContactPicker

  help                     Show this help
  exit / quit / q          Exit"#);
}
