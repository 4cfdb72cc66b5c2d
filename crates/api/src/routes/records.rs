//! One collection per record kind, all served by the generic handlers in
//! [`crate::handlers::records`].

use axum::routing::get;
use axum::Router;
use figtree_db::models::records::{
    address::Address, citation::Citation, event::Event, family::Family, media::Media, name::Name,
    note::Note, person::Person, place::Place, repository::Repository, source::Source, tag::Tag,
    url::Url,
};
use figtree_db::repositories::TreeRecord;

use crate::handlers::records;
use crate::state::AppState;

/// Routes for every record kind, at `/{kind path}` and `/{kind path}/{id}`.
pub fn router() -> Router<AppState> {
    let router = Router::new();
    let router = mount::<Address>(router);
    let router = mount::<Citation>(router);
    let router = mount::<Event>(router);
    let router = mount::<Family>(router);
    let router = mount::<Media>(router);
    let router = mount::<Name>(router);
    let router = mount::<Note>(router);
    let router = mount::<Person>(router);
    let router = mount::<Place>(router);
    let router = mount::<Repository>(router);
    let router = mount::<Source>(router);
    let router = mount::<Tag>(router);
    mount::<Url>(router)
}

/// ```text
/// GET    /{path}       -> list
/// POST   /{path}       -> create
/// GET    /{path}/{id}  -> get
/// PUT    /{path}/{id}  -> update
/// DELETE /{path}/{id}  -> delete
/// ```
fn mount<T: TreeRecord>(router: Router<AppState>) -> Router<AppState> {
    let collection = format!("/{}", T::KIND.path());
    let item = format!("{collection}/{{id}}");
    router
        .route(&collection, get(records::list::<T>).post(records::create::<T>))
        .route(
            &item,
            get(records::get::<T>)
                .put(records::update::<T>)
                .delete(records::delete::<T>),
        )
}
