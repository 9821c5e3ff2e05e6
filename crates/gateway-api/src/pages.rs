//! # Pages
//!
//! Minimal HTML for the three checkout views. Layout is deliberately plain;
//! the pages only render controller state and post back to the handlers.

use gateway_core::{
    CardFormState, CheckoutResult, GatewayConfig, Outcome, ValidationErrors, WalletContext,
    WalletFormState,
};

const PAGE_STYLE: &str = "font-family: system-ui; display: flex; justify-content: center; \
    align-items: center; min-height: 100vh; margin: 0; background: #f4f6f8;";
const CARD_STYLE: &str = "background: white; padding: 40px; border-radius: 16px; min-width: 320px;";

/// Escape text for an HTML body or attribute
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str, gateway: &GatewayConfig) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body style="{PAGE_STYLE}">
    <div style="{CARD_STYLE}">
{body}
        <p style="color: #999; font-size: 12px;">Payment is powered by <strong>{merchant}</strong>.</p>
    </div>
</body>
</html>
"#,
        title = escape(title),
        merchant = escape(&gateway.merchant_name),
    )
}

const ERROR_STYLE: &str = "color: #c0392b;";

fn input(
    name: &str,
    kind: &str,
    placeholder: &str,
    value: &str,
    errors: &ValidationErrors,
) -> String {
    let error = errors
        .get(name)
        .map(|message| {
            format!(
                r#"<span class="error-message" style="{ERROR_STYLE}">{}</span>"#,
                escape(message)
            )
        })
        .unwrap_or_default();
    let class = if errors.contains(name) { "form-input error" } else { "form-input" };
    format!(
        r#"        <div class="form-group">
            <input type="{kind}" name="{name}" class="{class}" placeholder="{placeholder}" value="{value}">
            {error}
        </div>
"#,
        value = escape(value),
    )
}

/// Card entry form
pub fn card_page(
    state: &CardFormState,
    errors: &ValidationErrors,
    gateway: &GatewayConfig,
) -> String {
    let mut body = String::from(
        "        <h1>Credit Card</h1>\n        <form method=\"post\" action=\"/card\">\n",
    );
    body.push_str(&input("cardNumber", "text", "Card Number", &state.card_number, errors));
    body.push_str(&input(
        "cardHolderName",
        "text",
        "Card Holder Name",
        &state.card_holder_name,
        errors,
    ));
    body.push_str(&input("expMonth", "text", "Exp. Month", &state.exp_month, errors));
    body.push_str(&input("expYear", "text", "Exp. Year", &state.exp_year, errors));
    body.push_str(&input("cvv", "text", "CVV", &state.cvv, errors));
    body.push_str(&format!(
        r#"        <div class="checkbox-group">
            <input type="checkbox" id="saveCard" name="saveCard" value="true"{checked}>
            <label for="saveCard">save card</label>
        </div>
        <button type="submit">Pay</button>
        </form>
"#,
        checked = if state.save_card { " checked" } else { "" },
    ));
    layout("Credit Card", &body, gateway)
}

/// Wallet entry form; posts back to itself with the same context
pub fn wallet_page(
    context: &WalletContext,
    state: &WalletFormState,
    errors: &ValidationErrors,
    gateway: &GatewayConfig,
) -> CheckoutResult<String> {
    let mut body = format!(
        r#"        <h1>CHECKOUT</h1>
        <p>WALLET NUMBER <strong>{wallet}</strong></p>
        <p>AMOUNT TO PAY <strong>{currency} {amount}</strong></p>
        <form method="post" action="/wallet?{action}">
"#,
        wallet = escape(&context.wallet_number),
        currency = escape(&gateway.wallet_currency),
        amount = escape(&context.amount),
        action = escape(&context.to_query_string()?),
    );
    body.push_str(&input("mpin", "password", "YOUR MPIN", &state.mpin, errors));
    body.push_str(&input("otp", "password", "One Time Password", &state.otp, errors));
    body.push_str("        <button type=\"submit\">Pay with Wallet</button>\n        </form>\n");
    Ok(layout("Mobile Wallet", &body, gateway))
}

/// Terminal result
pub fn result_page(outcome: Outcome, gateway: &GatewayConfig) -> String {
    let (icon, color) = if outcome.is_approved() {
        ("✅", "#27ae60")
    } else {
        ("❌", "#c0392b")
    };
    let body = format!(
        r#"        <div style="font-size: 60px; text-align: center;">{icon}</div>
        <h1 class="result-title" style="color: {color}; text-align: center;">{title}</h1>
        <p style="color: #666;">{thank_you}<br><br>{message}</p>
"#,
        title = outcome.title(),
        thank_you = outcome.thank_you(),
        message = outcome.message(),
    );
    layout(outcome.title(), &body, gateway)
}
