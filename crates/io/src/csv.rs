// CSV export of username lists

use std::io::Write;

pub const PROFILE_URL_BASE: &str = "https://instagram.com/";

/// Profile link for a username.
pub fn profile_url(username: &str) -> String {
    format!("{PROFILE_URL_BASE}{username}")
}

/// Write `usernames` as CSV, one row each, with an optional profile-link column.
pub fn write_usernames_csv<W: Write>(writer: W, usernames: &[String], with_urls: bool) -> Result<(), String> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    let header: &[&str] = if with_urls { &["Username", "Profile URL"] } else { &["Username"] };
    wtr.write_record(header).map_err(|e| e.to_string())?;

    for username in usernames {
        if with_urls {
            wtr.write_record([username.as_str(), profile_url(username).as_str()])
                .map_err(|e| e.to_string())?;
        } else {
            wtr.write_record([username.as_str()]).map_err(|e| e.to_string())?;
        }
    }

    wtr.flush().map_err(|e| e.to_string())
}
