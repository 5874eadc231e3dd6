use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBodyDoc { pub message: String, pub path: String }

#[derive(ToSchema)]
pub struct ActivityDoc { pub name: String, pub price: f64, pub status: Option<bool> }

#[derive(ToSchema)]
pub struct GroupDoc { pub name: String, pub price: f64, pub discount: Option<f64>, pub active: Option<bool> }

#[derive(ToSchema)]
pub struct ParentDoc { pub name: String, pub surname: String, pub email: String, pub address: String }

#[derive(ToSchema)]
pub struct UserDoc { pub username: String, pub password: String, pub email: String, pub role_id: i32, pub status: Option<bool> }

#[derive(ToSchema)]
pub struct AccountDoc {
    pub bank_name: String,
    pub account_number: String,
    pub pib: String,
    pub identification_number: String,
    pub activity_code: Option<i32>,
}

#[derive(ToSchema)]
pub struct KindergartenDoc {
    pub name: String,
    pub address: String,
    pub phone_number: Option<String>,
    pub email: String,
    pub logo: Option<String>,
    pub account_id: i32,
}

#[derive(ToSchema)]
pub struct ChildDoc {
    pub name: String,
    pub surname: String,
    pub sibling_order: Option<i32>,
    /// yyyy-MM-dd
    pub birthday: Option<String>,
    pub status: Option<bool>,
    pub group_id: i32,
    pub parent_id: i32,
    pub kindergarten_id: i32,
}

#[derive(ToSchema)]
pub struct BillDoc {
    pub year: i16,
    pub month: String,
    pub deadline: Option<String>,
    pub bill_code: Option<String>,
    pub payment_sum: Option<f64>,
    pub kindergarten_id: i32,
    pub child_id: i32,
}

#[derive(ToSchema)]
pub struct MailHistoryDoc { pub addresses: String, pub message: Option<String> }

#[derive(ToSchema)]
pub struct PaymentSlipDoc {
    pub payer: String,
    pub purpose: String,
    pub payee: String,
    pub payee_account: String,
    pub amount: f64,
    pub reference_model: Option<String>,
    pub reference_number: Option<String>,
}

#[derive(ToSchema)]
pub struct OutgoingMailDoc {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub payment_slip: Option<PaymentSlipDoc>,
}

#[derive(ToSchema)]
pub struct IdRefDoc { pub id: i32 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::activities::create,
        crate::routes::activities::list,
        crate::routes::activities::get_by_id,
        crate::routes::activities::update,
        crate::routes::activities::remove,
        crate::routes::groups::create,
        crate::routes::groups::list,
        crate::routes::groups::update,
        crate::routes::parents::create,
        crate::routes::parents::update,
        crate::routes::users::create,
        crate::routes::accounts::create,
        crate::routes::kindergartens::create,
        crate::routes::kindergartens::list,
        crate::routes::kindergartens::add_groups,
        crate::routes::kindergartens::add_activities,
        crate::routes::children::create,
        crate::routes::children::update,
        crate::routes::children::add_activities,
        crate::routes::bills::create,
        crate::routes::mail::create,
        crate::routes::mail::send_payment_slip,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBodyDoc,
            ActivityDoc,
            GroupDoc,
            ParentDoc,
            UserDoc,
            AccountDoc,
            KindergartenDoc,
            ChildDoc,
            BillDoc,
            MailHistoryDoc,
            PaymentSlipDoc,
            OutgoingMailDoc,
            IdRefDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "activities"),
        (name = "groups"),
        (name = "parent"),
        (name = "users"),
        (name = "kindergarten-account"),
        (name = "kindergarten"),
        (name = "child"),
        (name = "bill"),
        (name = "mail")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_resource_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/kindergarten/{id}/groups"));
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
