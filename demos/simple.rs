use std::io;

use mimepost::{Encoding, Envelope, Part};

fn main() {
    env_logger::init();

    let body = Part::from_bytes(
        "text/plain",
        Encoding::Base64,
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
    );

    let mail = Envelope {
        from: "john@example.com".to_string(),
        sender: "john@example.com".to_string(),
        reply_to: "reply@example.com".to_string(),
        to: vec!["bil@example.com".to_string(), "dan@example.com".to_string()],
        subject: "Check this out!".to_string(),
        parts: vec![body],
        charset: "utf-8".to_string(),
        ..Default::default()
    };

    if let Err(e) = mail.write(io::stdout()) {
        eprintln!("Failed to write mail: {}", e);
        std::process::exit(1);
    }
}
