use chrono::NaiveDate;
use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub nickname: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// `tag_type` is one of PLACE, COMPANION, ACTIVITY, MOOD, ETC.
#[derive(ToSchema)]
pub struct TagGroupDoc { pub tag_type: String, pub tag_name: Vec<String> }

#[derive(ToSchema)]
pub struct CreateExperienceDoc { pub title: String, pub content: String }

#[derive(ToSchema)]
pub struct UpdateExperienceDoc { pub title: Option<String>, pub content: Option<String> }

#[derive(ToSchema)]
pub struct ExperienceDoc { pub experience_id: Uuid, pub title: String, pub content: String }

#[derive(ToSchema)]
pub struct FileDoc {
    pub file_id: Uuid,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub url: String,
}

/// JSON carried in the `post` part of the create form.
#[derive(ToSchema)]
pub struct CreatePostDoc {
    pub title: String,
    pub begin_at: NaiveDate,
    pub finish_at: NaiveDate,
    pub tags: Vec<TagGroupDoc>,
    pub experiences: Vec<CreateExperienceDoc>,
}

#[derive(ToSchema)]
pub struct CreatePostForm {
    /// JSON encoded `CreatePostDoc`
    pub post: String,
    /// any number of binary file parts
    pub files: Vec<String>,
}

#[derive(ToSchema)]
pub struct UpdatePostDoc {
    pub title: String,
    pub begin_at: NaiveDate,
    pub finish_at: NaiveDate,
    pub tags: Vec<TagGroupDoc>,
}

#[derive(ToSchema)]
pub struct PostIdDoc { pub post_id: Uuid }

#[derive(ToSchema)]
pub struct OptionalPostIdDoc { pub post_id: Option<Uuid> }

#[derive(ToSchema)]
pub struct PostDetailDoc {
    pub post_id: Uuid,
    pub title: String,
    pub begin_at: NaiveDate,
    pub finish_at: NaiveDate,
    pub experiences: Vec<ExperienceDoc>,
    pub tags: Vec<TagGroupDoc>,
    pub files: Vec<FileDoc>,
}

#[derive(ToSchema)]
pub struct PostSummaryDoc {
    pub post_id: Uuid,
    pub title: String,
    pub begin_at: NaiveDate,
    pub finish_at: NaiveDate,
    pub tag_names: Vec<String>,
}

#[derive(ToSchema)]
pub struct PagePostsDoc { pub posts: Vec<PostSummaryDoc>, pub total_pages: u64, pub total_posts: u64 }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::posts::create,
        crate::routes::posts::list,
        crate::routes::posts::list_removed,
        crate::routes::posts::search,
        crate::routes::posts::get,
        crate::routes::posts::update,
        crate::routes::posts::delete,
        crate::routes::posts::restore,
        crate::routes::posts::hard_delete,
        crate::routes::tags::list,
        crate::routes::experiences::update,
        crate::routes::files::download,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            TagGroupDoc,
            CreateExperienceDoc,
            UpdateExperienceDoc,
            ExperienceDoc,
            FileDoc,
            CreatePostDoc,
            CreatePostForm,
            UpdatePostDoc,
            PostIdDoc,
            OptionalPostIdDoc,
            PostDetailDoc,
            PostSummaryDoc,
            PagePostsDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "posts"),
        (name = "tags"),
        (name = "experiences"),
        (name = "files")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_post_routes() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();
        let paths = &json["paths"];
        assert!(paths.get("/api/posts").is_some());
        assert!(paths.get("/api/posts/{id}/restore").is_some());
        assert!(paths.get("/auth/login").is_some());
    }
}
