//! Plain-text invoice and closing report rendering

use chrono::DateTime;
use shared::models::{DailySummary, Invoice};
use shared::order::Order;

/// Renders an invoice for display or printing
pub trait InvoiceRenderer: Send + Sync {
    fn render(&self, invoice: &Invoice) -> String;
}

/// Fixed-width receipt text
#[derive(Debug, Clone)]
pub struct PlainTextInvoiceRenderer {
    width: usize,
}

impl Default for PlainTextInvoiceRenderer {
    fn default() -> Self {
        Self { width: 48 }
    }
}

impl PlainTextInvoiceRenderer {
    pub fn new(width: usize) -> Self {
        Self { width: width.max(32) }
    }

    /// Closing report: the summary followed by the completed orders of the day
    pub fn render_daily_summary(&self, summary: &DailySummary, completed: &[Order]) -> String {
        let mut b = TextBuilder::new(self.width);

        b.center("CIERRE DEL DIA");
        b.center(&summary.date);
        b.eq_sep();

        b.line_lr("Pedidos", &summary.total_orders.to_string());
        b.line_lr("Ventas", &money(summary.total_revenue));
        b.line_lr("Ticket promedio", &money(summary.average_ticket()));
        b.dash_sep();

        let counts = &summary.orders_by_status;
        for (label, count) in [
            ("Pendientes", counts.pending),
            ("Preparando", counts.preparing),
            ("Listos", counts.ready),
            ("Completados", counts.completed),
            ("Cancelados", counts.cancelled),
        ] {
            b.line_lr(label, &count.to_string());
        }

        if !summary.orders_by_category.is_empty() {
            b.dash_sep();
            for (category, quantity) in &summary.orders_by_category {
                b.line_lr(category, &quantity.to_string());
            }
        }

        if !summary.top_items.is_empty() {
            b.dash_sep();
            b.line("MAS VENDIDOS");
            for item in &summary.top_items {
                b.line_lr(
                    &format!("{} x{}", item.name, item.quantity),
                    &money(item.revenue),
                );
            }
        }

        if !completed.is_empty() {
            b.eq_sep();
            for order in completed {
                b.line_lr(
                    &format!("#{} {}", shared::util::short_id(&order.id), order.customer.name),
                    &money(order.total),
                );
            }
        }

        b.finish()
    }
}

impl InvoiceRenderer for PlainTextInvoiceRenderer {
    fn render(&self, invoice: &Invoice) -> String {
        let mut b = TextBuilder::new(self.width);

        let issuer = &invoice.issuer;
        if !issuer.name.is_empty() {
            b.center(&issuer.name);
        }
        for detail in [&issuer.address, &issuer.phone, &issuer.email] {
            if !detail.is_empty() {
                b.center(detail);
            }
        }
        b.blank();

        b.line("FACTURA");
        b.line_lr(&format!("Num: {}", invoice.id), &format_time(invoice.created_at));
        b.line_lr(
            &format!("Pedido: #{}", shared::util::short_id(&invoice.order_id)),
            invoice.customer.table.as_deref().map_or("", |t| t),
        );
        b.line(&format!("Cliente: {}", invoice.customer.name));
        if !invoice.customer.phone.is_empty() {
            b.line(&format!("Tel: {}", invoice.customer.phone));
        }
        b.blank();

        // Items: quantity, description, unit price, amount
        let desc_width = self.width - 4 - 9 - 11;
        b.line(&format!(
            "{:<3} {:<desc$} {:>8} {:>10}",
            "UDS",
            "DESCRIPCION",
            "PRECIO",
            "IMPORTE",
            desc = desc_width
        ));
        b.eq_sep();
        for item in &invoice.items {
            b.line(&format!(
                "{:>3} {:<desc$} {:>8} {:>10}",
                item.quantity,
                truncate(&item.name, desc_width),
                format!("{:.2}", item.price),
                format!("{:.2}", item.line_total()),
                desc = desc_width
            ));
            if !item.customization.removed.is_empty() {
                let removed: Vec<&str> = item.customization.removed.iter().map(String::as_str).collect();
                b.line(&format!("    > Sin: {}", removed.join(", ")));
            }
            if !item.customization.selected.is_empty() {
                let selected: Vec<&str> = item.customization.selected.iter().map(String::as_str).collect();
                b.line(&format!("    > Con: {}", selected.join(", ")));
            }
        }
        b.eq_sep();

        b.line_lr("Subtotal", &money(invoice.subtotal));
        b.line_lr(
            &format!("IVA {:.0}%", invoice.tax_rate * 100.0),
            &money(invoice.tax),
        );
        b.line_lr("TOTAL", &money(invoice.total));

        if let Some(notes) = &invoice.customer.notes {
            b.blank();
            b.line(&format!("Notas: {}", notes));
        }

        b.blank();
        b.center("Gracias por su compra");
        b.finish()
    }
}

fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}

fn format_time(ts: i64) -> String {
    DateTime::from_timestamp_millis(ts)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

struct TextBuilder {
    out: String,
    width: usize,
}

impl TextBuilder {
    fn new(width: usize) -> Self {
        Self {
            out: String::new(),
            width,
        }
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn center(&mut self, text: &str) {
        let len = text.chars().count();
        let pad = self.width.saturating_sub(len) / 2;
        self.line(&format!("{}{}", " ".repeat(pad), text));
    }

    /// Left text and right text on one line, padded to the full width
    fn line_lr(&mut self, left: &str, right: &str) {
        let used = left.chars().count() + right.chars().count();
        let gap = self.width.saturating_sub(used).max(1);
        self.line(&format!("{}{}{}", left, " ".repeat(gap), right));
    }

    fn eq_sep(&mut self) {
        self.line(&"=".repeat(self.width));
    }

    fn dash_sep(&mut self) {
        self.line(&"-".repeat(self.width));
    }

    fn finish(self) -> String {
        self.out
    }
}
