use chrono::{NaiveDate, Utc};
use contracts::domain::a001_customer::{Address, Customer, CustomerId};
use contracts::domain::a002_product::{Product, ProductId};
use contracts::domain::a003_order::{
    Billing, Order, OrderLine, Shipping, SubmitOrderRequest, ValidationError, VariantSelection,
};
use contracts::enums::{DeliveryStatus, PaymentMethod};

/// Черновик заказа.
///
/// Живёт на стороне клиента, пока менеджер собирает заказ: покупатель,
/// строки, адреса, оплата. В репозиторий уходит только снимок, прошедший
/// [`validate_for_submit`](Self::validate_for_submit).
#[derive(Debug, Clone)]
pub struct OrderDraft {
    customer: Option<CustomerId>,
    lines: Vec<OrderLine>,
    delivery_status: DeliveryStatus,
    created_at: NaiveDate,
    payment_method: PaymentMethod,
    transaction_id: Option<String>,
    billing_address: Option<Address>,
    shipping_address: Option<Address>,
    // Адрес выбран вручную в этой сессии — дефолты покупателя его не трогают
    billing_chosen: bool,
    shipping_chosen: bool,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self {
            customer: None,
            lines: Vec::new(),
            delivery_status: DeliveryStatus::Processing,
            created_at: Utc::now().date_naive(),
            payment_method: PaymentMethod::CashOnDelivery,
            transaction_id: None,
            billing_address: None,
            shipping_address: None,
            billing_chosen: false,
            shipping_chosen: false,
        }
    }

    /// Заполнить черновик из сохранённого заказа для редактирования.
    ///
    /// Адреса заказа считаются выбранными вручную, так что повторный
    /// выбор того же покупателя их не перезапишет.
    pub fn from_order(order: &Order) -> Self {
        Self {
            customer: Some(order.customer),
            lines: order.lines.clone(),
            delivery_status: order
                .state
                .delivery_status
                .unwrap_or(DeliveryStatus::Processing),
            created_at: order.metadata.created_at.date_naive(),
            payment_method: order.billing.payment_method,
            transaction_id: order.billing.transaction_id.clone(),
            billing_address: Some(order.billing.address.clone()),
            shipping_address: Some(order.shipping.address.clone()),
            billing_chosen: true,
            shipping_chosen: true,
        }
    }

    pub fn customer(&self) -> Option<CustomerId> {
        self.customer
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn delivery_status(&self) -> DeliveryStatus {
        self.delivery_status
    }

    pub fn created_at(&self) -> NaiveDate {
        self.created_at
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }

    pub fn billing_address(&self) -> Option<&Address> {
        self.billing_address.as_ref()
    }

    pub fn shipping_address(&self) -> Option<&Address> {
        self.shipping_address.as_ref()
    }

    /// Выбрать покупателя.
    ///
    /// Подставляет его дефолтные адреса. Смена покупателя перезаписывает
    /// оба адреса; повторный выбор того же — только те, что не были
    /// выбраны вручную.
    pub fn select_customer(&mut self, customer: &Customer) {
        let changed = self.customer != Some(customer.id);

        if changed {
            self.billing_chosen = false;
            self.shipping_chosen = false;
            self.billing_address = customer.default_billing().cloned();
            self.shipping_address = customer.default_shipping().cloned();
        } else {
            if !self.billing_chosen {
                if let Some(address) = customer.default_billing() {
                    self.billing_address = Some(address.clone());
                }
            }
            if !self.shipping_chosen {
                if let Some(address) = customer.default_shipping() {
                    self.shipping_address = Some(address.clone());
                }
            }
        }

        self.customer = Some(customer.id);
    }

    /// Добавить товар в черновик.
    ///
    /// `None` — форма ещё без выбранного товара, ничего не делаем.
    /// Повторное добавление того же товара увеличивает количество, новая
    /// строка получает первый терм каждой вариантной оси.
    pub fn add_item(&mut self, product: Option<&Product>) {
        let Some(product) = product else {
            return;
        };

        if let Some(line) = self.lines.iter_mut().find(|l| l.product == product.id) {
            line.count += 1;
            return;
        }

        let selected_variants = product
            .variants
            .iter()
            .map(|axis| VariantSelection {
                name: axis.name.clone(),
                term: axis.terms.first().cloned().unwrap_or_default(),
            })
            .collect();

        self.lines.push(OrderLine {
            product: product.id,
            title: product.title.clone(),
            price: product.price,
            selling_price: product.selling_price,
            media: product.media.clone(),
            selected_variants,
            count: 1,
        });
    }

    /// Заменить терм одной вариантной оси строки. Неизвестный товар или
    /// ось — no-op.
    pub fn set_variant_term(&mut self, product: ProductId, axis_name: &str, term: &str) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product == product) {
            if let Some(variant) = line
                .selected_variants
                .iter_mut()
                .find(|v| v.name == axis_name)
            {
                variant.term = term.to_string();
            }
        }
    }

    pub fn remove_item(&mut self, product: ProductId) {
        self.lines.retain(|l| l.product != product);
    }

    pub fn set_delivery_status(&mut self, status: DeliveryStatus) {
        self.delivery_status = status;
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.created_at = date;
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Пустая строка означает «номера транзакции нет»
    pub fn set_transaction_id(&mut self, transaction_id: &str) {
        let trimmed = transaction_id.trim();
        self.transaction_id = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn set_billing_address(&mut self, address: Address) {
        self.billing_address = Some(address);
        self.billing_chosen = true;
    }

    pub fn set_shipping_address(&mut self, address: Address) {
        self.shipping_address = Some(address);
        self.shipping_chosen = true;
    }

    /// Вернуть черновик к пустому состоянию
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Сумма заказа по строкам черновика
    pub fn order_total(&self) -> f64 {
        self.lines.iter().map(|l| l.line_total()).sum()
    }

    /// Проверить черновик и собрать тело запроса.
    ///
    /// Порядок проверок: покупатель, строки, номер транзакции. Адрес,
    /// который так и не появился, уходит пустым — сервер хранит то, что
    /// держала форма.
    pub fn validate_for_submit(&self) -> Result<SubmitOrderRequest, ValidationError> {
        let customer = self.customer.ok_or(ValidationError::MissingCustomer)?;

        if self.lines.is_empty() {
            return Err(ValidationError::NoItems);
        }

        if let Some(transaction_id) = &self.transaction_id {
            if !is_valid_transaction_id(transaction_id) {
                return Err(ValidationError::InvalidTransactionId);
            }
        }

        Ok(SubmitOrderRequest {
            customer,
            products: self.lines.clone(),
            delivery_status: self.delivery_status,
            created_at: self.created_at,
            shipping: Shipping {
                address: self.shipping_address.clone().unwrap_or_default(),
            },
            billing: Billing {
                address: self.billing_address.clone().unwrap_or_default(),
                payment_method: self.payment_method,
                transaction_id: self.transaction_id.clone(),
                paid_amount: (self.order_total() * 100.0).round() / 100.0,
            },
        })
    }
}

impl Default for OrderDraft {
    fn default() -> Self {
        Self::new()
    }
}

/// Номер транзакции: после отбрасывания дефисов и тире должен остаться
/// хотя бы один символ, и только буквы и цифры
fn is_valid_transaction_id(id: &str) -> bool {
    let mut rest = id.chars().filter(|c| *c != '-' && *c != '—').peekable();
    rest.peek().is_some() && rest.all(|c| c.is_ascii_alphanumeric())
}
