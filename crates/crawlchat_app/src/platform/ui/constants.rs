pub const CMD_CRAWL: &str = "/crawl";
pub const CMD_STATUS: &str = "/status";
pub const CMD_HELP: &str = "/help";
pub const CMD_QUIT: &str = "/quit";
pub const CMD_EXIT: &str = "/exit";

pub const LABEL_USER: &str = "you";
pub const LABEL_BOT: &str = "bot";
pub const LABEL_SYSTEM: &str = "system";

pub const TYPING_TEXT: &str = "bot is typing...";
pub const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

pub const HELP_TEXT: &str = "\
Commands:
  /crawl <url>   crawl a website so you can ask about it
  /status        show crawl and chat state
  /help          show this help
  /quit          leave
Anything else is sent as a question once a site has been crawled.";
