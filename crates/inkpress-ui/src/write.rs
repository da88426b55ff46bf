//! Authoring form: title, description, rich-text body and image upload.

use inkpress_client::MediaUploader;
use inkpress_core::Post;
use inkpress_editor::{Document, Mark, utf16_to_offset};
use inkpress_views::{FormPhase, Navigator, PostForm};
use leptos::{ev, html, prelude::*, task::spawn_local};

use crate::{
    common::ErrorMessage,
    services::{RouterNavigator, use_services},
};

type Form = RwSignal<PostForm<Document>>;

/// Label of the submit button.
pub fn submit_label(phase: FormPhase, editing: bool) -> &'static str {
    match (phase, editing) {
        (FormPhase::Submitting, _) => "Publishing...",
        (_, true) => "Save changes",
        (_, false) => "Publish",
    }
}

/// CSS class of a toolbar button.
pub fn toolbar_class(active: bool) -> &'static str {
    if active {
        "inkpress-toolbar-button is-active"
    } else {
        "inkpress-toolbar-button"
    }
}

/// Map a textarea selection, reported in UTF-16 units, to an
/// `(anchor, head)` pair of document offsets.
pub fn dom_selection(text: &str, start: u32, end: u32, backward: bool) -> (usize, usize) {
    let start = utf16_to_offset(text, start as usize);
    let end = utf16_to_offset(text, end as usize);
    if backward { (end, start) } else { (start, end) }
}

/// Create a post, or edit `post` when given.
///
/// On success the page navigates to the post list.
#[component]
pub fn WritePostPage(
    /// Post to edit. Creates a new post when absent.
    #[prop(optional)]
    post: Option<Post>,
    /// Shows a "Cancel" button invoking this.
    #[prop(optional)]
    on_cancel: Option<Callback<()>>,
) -> impl IntoView {
    let services = use_services();
    let posts = StoredValue::new(services.posts);
    let uploader = StoredValue::new(services.uploader);
    let navigator = RouterNavigator::new();

    let editing = post.is_some();
    let form: Form = RwSignal::new(match &post {
        Some(post) => PostForm::for_post(post),
        None => PostForm::create(),
    });

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(request) = form.try_update(PostForm::begin_submit).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = request.send(&posts.get_value()).await;
            if let Some(route) = form.try_update(|f| f.complete_submit(result)).flatten() {
                navigator.navigate(route);
            }
        });
    };

    let on_file = move |ev: ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        input.set_value("");
        if !form.try_update(PostForm::begin_upload).unwrap_or(false) {
            return;
        }
        spawn_local(async move {
            let result = uploader.get_value().upload(file).await;
            form.update(|f| f.complete_upload(result));
        });
    };

    let error = move || {
        form.with(|f| f.last_error().map(str::to_string))
            .map(|message| view! { <ErrorMessage message=message /> })
    };

    let cancel = on_cancel.map(|on_cancel| {
        view! {
          <button type="button" class="inkpress-button" on:click=move |_| on_cancel.run(())>
            "Cancel"
          </button>
        }
    });

    view! {
      <form class="inkpress-write" on:submit=on_submit>
        <h1>{if editing { "Edit post" } else { "Write a post" }}</h1>

        <label class="inkpress-field">
          <span>"Title"</span>
          <input
            type="text"
            name="title"
            placeholder="Title"
            prop:value=move || form.with(|f| f.draft().title.clone())
            on:input=move |ev| form.update(|f| f.set_title(event_target_value(&ev)))
          />
        </label>
        <p class="inkpress-slug">
          "Slug: " <code>{move || form.with(|f| f.draft().slug.clone())}</code>
        </p>

        <label class="inkpress-field">
          <span>"Description"</span>
          <textarea
            name="description"
            rows="2"
            prop:value=move || form.with(|f| f.draft().description.clone())
            on:input=move |ev| form.update(|f| f.set_description(event_target_value(&ev)))
          ></textarea>
        </label>

        <Toolbar form=form />
        <EditorSurface form=form />

        <label class="inkpress-field inkpress-upload">
          <span>"Image"</span>
          <input
            type="file"
            accept="image/*"
            disabled=move || form.with(PostForm::is_uploading)
            on:change=on_file
          />
          <Show when=move || form.with(PostForm::is_uploading)>
            <span class="inkpress-uploading">"Uploading..."</span>
          </Show>
        </label>

        {error}

        <div class="inkpress-form-actions">
          <button
            type="submit"
            class="inkpress-button inkpress-button-primary"
            disabled=move || !form.with(PostForm::can_submit)
          >
            {move || submit_label(form.with(PostForm::phase), editing)}
          </button>
          {cancel}
        </div>
      </form>
    }
}

/// Formatting buttons for the editor selection.
#[component]
pub fn Toolbar(form: Form) -> impl IntoView {
    let buttons = Mark::ALL
        .into_iter()
        .map(move |mark| {
            view! {
              <button
                type="button"
                class=move || toolbar_class(form.with(|f| f.mark_active(mark)))
                aria-pressed=move || form.with(|f| f.mark_active(mark)).to_string()
                disabled=move || !form.with(|f| f.mark_enabled(mark))
                // Keep the editor selection when clicking.
                on:mousedown=|ev: ev::MouseEvent| ev.prevent_default()
                on:click=move |_| form.update(|f| f.toggle_mark(mark))
              >
                {mark.label()}
              </button>
            }
        })
        .collect_view();

    view! {
      <div class="inkpress-toolbar" role="toolbar">
        {buttons}
      </div>
    }
}

/// Editing surface over the document's plain-text projection, with a live
/// HTML preview.
#[component]
pub fn EditorSurface(form: Form) -> impl IntoView {
    let textarea = NodeRef::<html::Textarea>::new();
    let text = Memo::new(move |_| form.with(|f| f.editor().plain_text()));

    let sync_selection = move || {
        let Some(el) = textarea.get_untracked() else {
            return;
        };
        let value = el.value();
        let start = el.selection_start().ok().flatten().unwrap_or(0);
        let end = el.selection_end().ok().flatten().unwrap_or(start);
        let backward = el.selection_direction().ok().flatten().as_deref() == Some("backward");
        let (anchor, head) = dom_selection(&value, start, end, backward);
        form.update(|f| f.edit_content(|doc| doc.select(anchor, head)));
    };

    let on_input = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        form.update(|f| f.edit_content(|doc| doc.apply_text_change(&value)));
        sync_selection();
    };

    view! {
      <div class="inkpress-editor">
        <textarea
          node_ref=textarea
          class="inkpress-editor-input"
          rows="12"
          prop:value=move || text.get()
          on:input=on_input
          on:select=move |_| sync_selection()
          on:keyup=move |_| sync_selection()
          on:mouseup=move |_| sync_selection()
        ></textarea>
        <div
          class="inkpress-editor-preview inkpress-prose"
          inner_html=move || form.with(|f| f.draft().content.clone())
        ></div>
      </div>
    }
}
