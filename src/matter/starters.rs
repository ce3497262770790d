use super::MatterTemplate;

pub(super) fn starter(template: MatterTemplate) -> &'static str {
    match template {
        MatterTemplate::Copyright => COPYRIGHT,
        MatterTemplate::Dedication => DEDICATION,
        MatterTemplate::Epigraph => EPIGRAPH,
        MatterTemplate::Blurbs => BLURBS,
        MatterTemplate::TitlePage => TITLE_PAGE,
        MatterTemplate::HalfTitle => HALF_TITLE,
        MatterTemplate::AboutAuthor => ABOUT_AUTHOR,
        MatterTemplate::AlsoBy => ALSO_BY,
        MatterTemplate::PreviewMore => PREVIEW_MORE,
    }
}

macro_rules! starter {
    ($block:literal, $instructions:literal) => {
        concat!(
            "---\n",
            $block,
            "---\n\n",
            "(Everything below this point is ignored when binding.)",
            "\n\nInstructions:\n\n",
            $instructions
        )
    };
}

const COPYRIGHT: &str = starter!(
    r#"Book Name:
Year: "2024"
Copyright Holder: Author Name
Collaborator 1: Cover Art by
Collaborator 2: Illustration by
Collaborator 3:
ISBN 1:
ISBN 2:
Disclaimer: This is a work of fiction. Names, characters, places and incidents either are products of the author's imagination or are used fictitiously. Any resemblance to actual events or locales or persons, living or dead, is entirely coincidental.
Publisher 1: Published by
Publisher 2:
"#,
    r#"- Book Name: The title of the book.
- Year: The year of publication.
- Copyright Holder: The name of the copyright holder, usually the author.
- Collaborator #: The role and name of a collaborator, e.g. "Cover Art by Jane Doe". Add more by increasing the number.
- ISBN #: An ISBN, e.g. "ISBN 123-4-5678-9012-3 (ebook)". Add more by increasing the number.
- Disclaimer: Disclaimer text.
- Publisher #: Publisher line, e.g. "Published by My Publishing Company". Add more by increasing the number.
"#
);

const DEDICATION: &str = starter!(
    r#"Title: Dedication
Text: This book is dedicated to...
"#,
    r#"- Title: The title of the dedication.
- Text: The text of the dedication.
"#
);

const EPIGRAPH: &str = starter!(
    r#"Quote 1: It was the best of times, it was the worst of times.
Quote 2:
Author: Charles Dickens
Source: A Tale of Two Cities
"#,
    r#"- Quote #: One paragraph of the quote. Add more paragraphs by increasing the number.
- Author: The author of the quote. Shown in bold.
- Source: (Optional) Where the quote comes from. Shown in italics.
"#
);

const BLURBS: &str = starter!(
    r#"Title: Reviews
Blurb 1: A thrilling page-turner!
Source 1: Binders Weekly
Blurb 2: A must-read for fans of the genre.
Source 2: My Mom
Blurb 3:
Source 3:
"#,
    r#"- Title: The title of the blurb page.
- Blurb #: One blurb. Add more by increasing the number.
- Source #: Who said it. Shown in bold. Keep one source per blurb.
"#
);

const TITLE_PAGE: &str = starter!(
    r#"Title: Book Title
Subtitle: Subtitle
Author Name 1: Author Name
Author Name 2:
Collaborator Role 1: Cover Art
Collaborator Name 1: Artist McArtface
Collaborator Role 2: Edited by
Collaborator Name 2: My Editor
Collaborator Role 3:
Collaborator Name 3:
Publisher: Publisher Name
Publisher Link: https://www.publisher.com
"#,
    r#"- Title: The title of the book.
- Subtitle: The subtitle of the book.
- Author Name #: An author. Add more by increasing the number; they are shown side by side.
- Collaborator Role #: A collaborator's role, e.g. "Cover Art". Add more by increasing the number.
- Collaborator Name #: A collaborator's name. Keep one name per role.
- Publisher: The name of the publisher.
- Publisher Link: (Optional) A link to the publisher's website.
"#
);

const HALF_TITLE: &str = starter!(
    r#"Title: Book Title
"#,
    r#"- Title: The title of the book.
"#
);

const ABOUT_AUTHOR: &str = starter!(
    r#"Title: About the Author
About Author 1: Author Name is the author of Book Name. Introduce other books or series here.
About Author 2: Something personal.
About Author 3:
Link To Amazon: https://www.amazon.com/author/authorname
Link To Apple:
Link To Audible:
Link To Facebook:
Link To Patreon:
Link To Royal Road:
Link To Twitter:
Link To Website:
"#,
    r#"- Title: The title of the page.
- About Author #: One paragraph about the author. Add more by increasing the number.
- Link To X: (Optional) A link to the author's page on that platform.
"#
);

const ALSO_BY: &str = starter!(
    r#"Title: Also By Author Name
Book 1: Book Title 1
Link 1: https://www.amazon.com/myotherbook1
Description 1: Description of Book 1
Book 2: Book Title 2
Link 2: https://www.amazon.com/myotherbook2
Description 2: Description of Book 2
Book 3:
Link 3:
Description 3:
"#,
    r#"- Title: The title of the page.
- Book #: The title of a book. Add more by increasing the number.
- Link #: A link to the book.
- Description #: A short description of the book. Keep one link and one description per book.
"#
);

const PREVIEW_MORE: &str = r#"---
Title: Preview More
Book: Book Title 1
Link: https://www.amazon.com/myotherbook1
Description: Description of Book 1
---

Replace this line with the preview text, written as markdown:

# Chapter 1

Lorem ipsum dolor sit amet, consectetur adipiscing elit, sed do eiusmod tempor incididunt ut labore et dolore magna aliqua.
"#;
