//! Request inputs and response shapes for the Reddit moderation endpoints.

pub mod flair;
pub mod widgets;

pub use flair::{
    ActionResult, AllowableContent, Flair, FlairChoice, FlairConfigInput, FlairCreateInput,
    FlairLinkInput, FlairListResult, FlairListResultContainer, FlairNameListingInput,
    FlairPosition, FlairSelectorResult, FlairSelectorResultContainer, FlairTemplateChanges,
    FlairTemplateInput, FlairTemplateV2Input, FlairType, FlairV2, NewFlairTemplate, TextColor,
};
pub use widgets::{
    CommunityDetail, CommunityEntry, PostFlairDisplay, Widget, WidgetCalendar,
    WidgetCalendarConfiguration, WidgetCommunityList, WidgetLayout, WidgetOrder, WidgetPostFlair,
    WidgetResults, WidgetSection, WidgetStyles, WidgetTextArea,
};
