//! Twilio channel: account lookup, outbound sendMessage, and TwiML replies.

use serde::Deserialize;

const TWILIO_API_BASE: &str = "https://api.twilio.com";

/// Client for the Twilio REST API (WhatsApp sandbox).
#[derive(Clone)]
pub struct TwilioChannel {
    account_sid: String,
    auth_token: String,
    from_number: String,
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, thiserror::Error)]
pub enum TwilioError {
    #[error("twilio request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("twilio api error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    #[serde(default)]
    friendly_name: Option<String>,
}

impl TwilioChannel {
    pub fn new(
        account_sid: String,
        auth_token: String,
        from_number: String,
        base_url: Option<String>,
    ) -> Self {
        let base_url = base_url
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| TWILIO_API_BASE.to_string());
        Self {
            account_sid,
            auth_token,
            from_number,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// GET /2010-04-01/Accounts/{sid}.json — fetch the account record.
    /// Returns the account friendly name; used by the credential verifier.
    pub async fn fetch_account(&self) -> Result<String, TwilioError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}.json",
            self.base_url, self.account_sid
        );
        let res = self
            .client
            .get(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TwilioError::Api(format!("{} {}", status, body)));
        }
        let data: AccountResponse = res.json().await?;
        Ok(data.friendly_name.unwrap_or_default())
    }

    /// POST /2010-04-01/Accounts/{sid}/Messages.json — send one message from
    /// the configured sender number.
    pub async fn send_message(&self, to: &str, body: &str) -> Result<(), TwilioError> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let params = [("From", self.from_number.as_str()), ("To", to), ("Body", body)];
        let res = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&params)
            .send()
            .await?;
        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(TwilioError::Api(format!("{} {}", status, body)));
        }
        Ok(())
    }
}

/// Builder for the TwiML messaging reply document returned by the webhook.
#[derive(Debug, Default)]
pub struct MessagingResponse {
    messages: Vec<String>,
}

impl MessagingResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, text: &str) -> Self {
        self.messages.push(text.to_string());
        self
    }

    /// Serialize to the XML document Twilio expects as the webhook response body.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response>");
        for m in &self.messages {
            out.push_str("<Message>");
            out.push_str(&xml_escape(m));
            out.push_str("</Message>");
        }
        out.push_str("</Response>");
        out
    }
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twiml_wraps_message_text() {
        let xml = MessagingResponse::new().message("Hi there").to_xml();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>Hi there</Message></Response>"
        );
    }

    #[test]
    fn twiml_escapes_markup_characters() {
        let xml = MessagingResponse::new()
            .message("a < b && c > \"d\"")
            .to_xml();
        assert!(xml.contains("a &lt; b &amp;&amp; c &gt; &quot;d&quot;"));
        assert!(!xml.contains("a < b"));
    }

    #[test]
    fn twiml_without_messages_is_an_empty_response() {
        let xml = MessagingResponse::new().to_xml();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response></Response>"
        );
    }
}
