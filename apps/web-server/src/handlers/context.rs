//! Conversions from domain values to the view contexts in `yatube-shared`.

use yatube_core::ValidationErrors;
use yatube_core::domain::{Author, Group, PostView};
use yatube_core::forms::{POST_FORM, PostForm};
use yatube_core::pagination::Page;
use yatube_shared::view::{
    AuthorItem, Choice, FormField, FormView, GroupItem, PageObj, PostItem,
};

pub fn author_item(author: Author) -> AuthorItem {
    AuthorItem {
        id: author.id,
        username: author.username,
    }
}

pub fn group_item(group: Group) -> GroupItem {
    GroupItem {
        id: group.id,
        title: group.title,
        slug: group.slug,
        description: group.description,
    }
}

pub fn post_item(view: PostView) -> PostItem {
    PostItem {
        id: view.post.id,
        text: view.post.text,
        pub_date: view.post.pub_date,
        author: author_item(view.author),
        group: view.group.map(group_item),
        image: view.post.image,
    }
}

pub fn page_obj(page: Page<PostView>) -> PageObj<PostItem> {
    let page = page.map(post_item);
    PageObj {
        object_list: page.object_list,
        number: page.number,
        num_pages: page.num_pages,
        count: page.count,
        has_next: page.has_next,
        has_previous: page.has_previous,
        next_page_number: page.next_page_number,
        previous_page_number: page.previous_page_number,
    }
}

/// The post form as rendered: schema, current values, errors and group choices.
pub fn post_form(values: &PostForm, errors: Option<&ValidationErrors>, groups: &[Group]) -> FormView {
    let fields = POST_FORM
        .fields
        .iter()
        .map(|spec| FormField {
            name: spec.name.to_string(),
            label: spec.label.to_string(),
            help_text: spec.help_text.to_string(),
            widget: spec.widget.as_str().to_string(),
            required: spec.required,
            value: values.value(spec.name).map(str::to_string),
            errors: errors
                .map(|errors| errors.for_field(spec.name).map(|e| e.message()).collect())
                .unwrap_or_default(),
        })
        .collect();

    let group_choices = groups
        .iter()
        .map(|g| Choice {
            value: g.id.to_string(),
            label: g.title.clone(),
        })
        .collect();

    FormView {
        fields,
        group_choices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use yatube_core::{ValidationError, ValidationErrorKind};

    #[test]
    fn test_post_form_carries_values_and_errors() {
        let group = Group::new("Cats", "cats", "").unwrap();
        let values = PostForm {
            text: String::new(),
            group: Some(group.id.to_string()),
        };
        let errors: ValidationErrors =
            ValidationError::new("text", ValidationErrorKind::EmptyField).into();

        let form = post_form(&values, Some(&errors), std::slice::from_ref(&group));

        let text = form.field("text").unwrap();
        assert_eq!(text.widget, "textarea");
        assert!(text.required);
        assert_eq!(text.errors.len(), 1);

        let group_field = form.field("group").unwrap();
        assert_eq!(group_field.value, Some(group.id.to_string()));
        assert!(group_field.errors.is_empty());

        assert_eq!(form.group_choices[0].label, "Cats");
        assert!(!form.is_valid());
    }

    #[test]
    fn test_page_obj_keeps_navigation() {
        let author = Author {
            id: Uuid::new_v4(),
            username: "leo".into(),
        };
        let views: Vec<PostView> = (0..12)
            .map(|i| PostView {
                post: yatube_core::domain::Post::new(author.id, format!("post {i}"), None),
                author: author.clone(),
                group: None,
            })
            .collect();

        let page = yatube_core::pagination::paginate(views, Some("2"), 10);
        let obj = page_obj(page);

        assert_eq!(obj.object_list.len(), 2);
        assert_eq!(obj.number, 2);
        assert_eq!(obj.previous_page_number, Some(1));
        assert!(!obj.has_next);
        assert_eq!(obj.object_list[0].author.username, "leo");
    }
}
