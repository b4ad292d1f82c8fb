// Formatting helpers shared by services and handlers

/// Mask an email address for logs, `sarah@example.com` -> `sa***@example.com`
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let local = &email[..at_pos];
        let domain = &email[at_pos..];

        if local.chars().count() <= 2 {
            return email.to_string();
        }

        let visible: String = local.chars().take(2).collect();
        format!("{}***{}", visible, domain)
    } else {
        email.to_string()
    }
}

/// Turn a camelCase key into a title, `earlyMincha` -> `Early Mincha`
pub fn title_case_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() {
            out.push(' ');
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out
}

/// Lowercase trimmed email, used as the account key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
